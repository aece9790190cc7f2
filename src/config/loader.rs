//! Settings loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogFormat, Settings};
use crate::resolver::OverrideType;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "CONFIG_OVERLAY";

/// Settings file name
const SETTINGS_FILE_NAME: &str = "config-overlay.toml";

/// Environment variable for explicit settings path
const SETTINGS_PATH_ENV: &str = "CONFIG_OVERLAY_SETTINGS";

const PROJECT_QUALIFIER: &str = "org";
const PROJECT_ORGANIZATION: &str = "config-overlay";
const PROJECT_APPLICATION: &str = "config-overlay";

/// Settings loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    /// Resolved settings file path (if any)
    pub settings_path: Option<PathBuf>,
    /// The loaded settings
    pub settings: Settings,
}

impl SettingsLoader {
    /// Load settings using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `CONFIG_OVERLAY_SETTINGS` environment variable (explicit path)
    /// 2. `./config-overlay.toml` (current directory)
    /// 3. `config-overlay.toml` in the platform config directory
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override any file values.
    pub fn load() -> ConfigResult<Self> {
        let settings_path = resolve_settings_path();

        let mut settings = match settings_path {
            Some(ref path) => load_from_file(path)?,
            None => Settings::default(),
        };

        apply_env_overrides(&mut settings)?;

        Ok(Self {
            settings_path,
            settings,
        })
    }

    /// Load settings from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut settings = load_from_file(&path)?;
        apply_env_overrides(&mut settings)?;

        Ok(Self {
            settings_path: Some(path),
            settings,
        })
    }

    /// Create a loader with default settings (no file).
    pub fn with_defaults() -> ConfigResult<Self> {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings)?;

        Ok(Self {
            settings_path: None,
            settings,
        })
    }

    /// Get the loaded settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Consume the loader and return the settings.
    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Save the current settings to a specific file.
    pub fn save_to(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        save_to_file(&self.settings, path.as_ref())
    }
}

/// Resolve the settings file path using standard locations.
pub fn resolve_settings_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_settings = PathBuf::from(SETTINGS_FILE_NAME);
    if cwd_settings.exists() {
        return Some(cwd_settings);
    }

    // 3. Platform config directory
    default_settings_path().filter(|path| path.exists())
}

/// Platform-specific location for the settings file.
pub fn default_settings_path() -> Option<PathBuf> {
    ProjectDirs::from(PROJECT_QUALIFIER, PROJECT_ORGANIZATION, PROJECT_APPLICATION)
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
}

fn load_from_file(path: &Path) -> ConfigResult<Settings> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn save_to_file(settings: &Settings, path: &Path) -> ConfigResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply environment variable overrides to the settings.
///
/// Environment variables follow the pattern: `CONFIG_OVERLAY_<KEY>`
/// For example:
/// - `CONFIG_OVERLAY_GLOBAL_SECTION=base`
/// - `CONFIG_OVERLAY_OVERRIDE_TYPE=machine-name`
/// - `CONFIG_OVERLAY_SECTIONS_FILE=/etc/app/sections.toml`
fn apply_env_overrides(settings: &mut Settings) -> ConfigResult<()> {
    let var = |key: &str| std::env::var(format!("{}_{}", ENV_PREFIX, key)).ok();

    // Resolver overrides
    if let Some(val) = var("GLOBAL_SECTION") {
        settings.resolver.global_section = val;
    }
    if let Some(val) = var("OVERRIDE_TYPE") {
        settings.resolver.override_type = val
            .parse::<OverrideType>()
            .map_err(|e| ConfigError::invalid_env(format!("{ENV_PREFIX}_OVERRIDE_TYPE"), e))?;
    }
    if let Some(val) = var("OVERRIDE_KEY") {
        settings.resolver.override_key = Some(val);
    }

    // Source overrides
    if let Some(val) = var("SECTIONS_FILE") {
        settings.sources.sections_file = Some(PathBuf::from(val));
    }
    if let Some(val) = var("APP_SETTINGS_FILE") {
        settings.sources.app_settings_file = Some(PathBuf::from(val));
    }

    // Logging overrides
    if let Some(val) = var("LOG_LEVEL") {
        settings.logging.level = val;
    }
    if let Some(val) = var("LOG_FORMAT") {
        settings.logging.format = val
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::invalid_env(format!("{ENV_PREFIX}_LOG_FORMAT"), e))?;
    }

    Ok(())
}
