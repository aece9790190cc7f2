//! Errors raised while loading or saving the tool settings.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read settings file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Settings file '{path}' is not valid: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Cannot write settings file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `CONFIG_OVERLAY_*` variable holds a value the setting cannot take.
    #[error("Environment variable '{var}' is invalid: {message}")]
    InvalidEnv { var: String, message: String },

    /// No section file was given on the command line or in the settings.
    #[error("No section file configured: pass --sections or set sources.sections_file")]
    MissingSectionsFile,
}

impl ConfigError {
    pub fn invalid_env(var: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidEnv {
            var: var.into(),
            message: message.to_string(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_env_message() {
        let err = ConfigError::invalid_env("CONFIG_OVERLAY_LOG_FORMAT", "unknown log format 'fancy'");
        assert_eq!(
            err.to_string(),
            "Environment variable 'CONFIG_OVERLAY_LOG_FORMAT' is invalid: unknown log format 'fancy'"
        );
    }
}
