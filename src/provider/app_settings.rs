//! Flat key/value application settings.
//!
//! Settings are plain strings. They can be loaded from a flat TOML file
//! (`myoverridekey = "jonDevAppSettingTest"`) or given as `key=value` pairs.

use super::traits::AppSettingProvider;
use crate::config::SettingsLoader;
use crate::error::{ResolveError, ResolveResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// App settings file used when the tool settings do not name one.
pub const DEFAULT_APP_SETTINGS_FILE: &str = "appsettings.toml";

/// In-memory application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    values: BTreeMap<String, String>,
}

impl AppSettings {
    /// Create an empty settings map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build settings from key/value pairs. Later pairs win.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse flat settings from TOML text.
    ///
    /// Strings are taken as-is; integers, floats, booleans and datetimes are
    /// stored in their TOML text form. Tables and arrays are rejected.
    pub fn from_toml_str(content: &str) -> ResolveResult<Self> {
        let table = content
            .parse::<toml::Table>()
            .map_err(|source| ResolveError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        Self::from_table(table)
    }

    /// Load flat settings from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> ResolveResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ResolveError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = content
            .parse::<toml::Table>()
            .map_err(|source| ResolveError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_table(table)
    }

    /// Load the application's own settings.
    ///
    /// Reads the file named by `sources.app_settings_file` in the tool
    /// settings (which `CONFIG_OVERLAY_APP_SETTINGS_FILE` overrides), or
    /// [`DEFAULT_APP_SETTINGS_FILE`] in the current directory. A missing file
    /// yields empty settings.
    pub fn load_default() -> ResolveResult<Self> {
        let path = SettingsLoader::load()?
            .into_settings()
            .sources
            .app_settings_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_APP_SETTINGS_FILE));

        if !path.exists() {
            debug!("No app settings at {}", path.display());
            return Ok(Self::new());
        }
        Self::load_from(path)
    }

    /// Split a `key=value` string into a pair.
    pub fn parse_pair(raw: &str) -> ResolveResult<(String, String)> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| ResolveError::invalid_app_setting(raw, "expected KEY=VALUE"))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(ResolveError::invalid_app_setting(raw, "key must not be empty"));
        }
        Ok((key.to_string(), value.to_string()))
    }

    /// Insert or replace a setting.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no settings.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn from_table(table: toml::Table) -> ResolveResult<Self> {
        let mut values = BTreeMap::new();
        for (key, value) in table {
            let text = match value {
                toml::Value::String(s) => s,
                toml::Value::Table(_) | toml::Value::Array(_) => {
                    return Err(ResolveError::invalid_app_setting(
                        key,
                        format!("{} values are not supported", value.type_str()),
                    ))
                }
                other => other.to_string(),
            };
            values.insert(key, text);
        }
        Ok(Self { values })
    }
}

impl AppSettingProvider for AppSettings {
    fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_toml_str() {
        let settings = AppSettings::from_toml_str(
            "myoverridekey = \"jonDevAppSettingTest\"\nretries = 3\nenabled = true\n",
        )
        .unwrap();

        assert_eq!(settings.len(), 3);
        assert_eq!(
            settings.get("myoverridekey").as_deref(),
            Some("jonDevAppSettingTest")
        );
        assert_eq!(settings.get("retries").as_deref(), Some("3"));
        assert_eq!(settings.get("enabled").as_deref(), Some("true"));
    }

    #[test]
    fn test_nested_values_rejected() {
        let result = AppSettings::from_toml_str("[nested]\nkey = \"v\"\n");
        assert!(matches!(
            result,
            Err(ResolveError::InvalidAppSetting { ref key, .. }) if key == "nested"
        ));

        let result = AppSettings::from_toml_str("list = [1, 2]");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            AppSettings::parse_pair("myoverridekey=jonDev").unwrap(),
            ("myoverridekey".to_string(), "jonDev".to_string())
        );
        // Only the first '=' splits.
        assert_eq!(
            AppSettings::parse_pair("k=a=b").unwrap(),
            ("k".to_string(), "a=b".to_string())
        );
        assert!(AppSettings::parse_pair("novalue").is_err());
        assert!(AppSettings::parse_pair(" =value").is_err());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let settings = AppSettings::from_pairs([("myoverridekey", "jonDev")]);
        assert!(settings.contains_key("myoverridekey"));
        assert!(!settings.contains_key("MyOverrideKey"));
        assert_eq!(settings.get("MyOverrideKey"), None);
    }

    #[test]
    #[serial]
    fn test_load_default_reads_configured_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("appsettings.toml");
        fs::write(&path, "myoverridekey = \"jonDevAppSettingTest\"\n").expect("write");
        env::set_var("CONFIG_OVERLAY_APP_SETTINGS_FILE", &path);

        let settings = AppSettings::load_default();
        env::remove_var("CONFIG_OVERLAY_APP_SETTINGS_FILE");

        assert_eq!(
            settings.unwrap().get("myoverridekey").as_deref(),
            Some("jonDevAppSettingTest")
        );
    }

    #[test]
    #[serial]
    fn test_load_default_missing_file_is_empty() {
        let tmp = TempDir::new().expect("tmp");
        env::set_var("CONFIG_OVERLAY_APP_SETTINGS_FILE", tmp.path().join("absent.toml"));

        let settings = AppSettings::load_default();
        env::remove_var("CONFIG_OVERLAY_APP_SETTINGS_FILE");

        assert!(settings.unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("appsettings.toml");
        fs::write(&path, "myoverridekey = \"jonDevAppSettingTest\"\n").expect("write");

        let settings = AppSettings::load_from(&path).expect("settings");
        assert!(settings.contains_key("myoverridekey"));
    }
}
