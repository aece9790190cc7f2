//! Settings schema definitions.
//!
//! Describes the `config-overlay` tool's own settings file. Every section has
//! defaults, so an empty file (or no file) is valid.

use crate::resolver::{OverrideType, DEFAULT_GLOBAL_SECTION};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root settings structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// How overrides are resolved
    pub resolver: ResolverSettings,
    /// Where sections and app settings come from
    pub sources: SourceSettings,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Resolver settings section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Name of the base section
    pub global_section: String,
    /// Override selection policy
    pub override_type: OverrideType,
    /// Override key used when none is given on the command line
    pub override_key: Option<String>,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            global_section: DEFAULT_GLOBAL_SECTION.to_string(),
            override_type: OverrideType::Chain,
            override_key: None,
        }
    }
}

/// Data source settings section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// TOML file whose tables are the configuration sections
    pub sections_file: Option<PathBuf>,
    /// Flat TOML file of app settings
    pub app_settings_file: Option<PathBuf>,
}

/// Diagnostics written to stderr by the tool.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `warn` or `config_overlay=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    #[default]
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.resolver.global_section, "global");
        assert_eq!(settings.resolver.override_type, OverrideType::Chain);
        assert!(settings.sources.sections_file.is_none());
        assert_eq!(settings.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        assert!(toml_str.contains("[resolver]"));
        assert!(toml_str.contains("override_type = \"chain\""));
        assert!(toml_str.contains("[logging]"));
    }

    #[test]
    fn test_settings_deserialization() {
        let toml_str = r#"
            [resolver]
            global_section = "base"
            override_type = "machine-name"

            [sources]
            sections_file = "sections.toml"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.resolver.global_section, "base");
        assert_eq!(settings.resolver.override_type, OverrideType::MachineName);
        assert_eq!(
            settings.sources.sections_file,
            Some(PathBuf::from("sections.toml"))
        );
        assert_eq!(settings.logging.level, "warn");
    }

    #[test]
    fn test_unknown_override_type_rejected() {
        let result: Result<Settings, _> = toml::from_str("[resolver]\noverride_type = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("fancy".parse::<LogFormat>().is_err());
    }
}
