//! Resolution error types.
//!
//! Only genuine failures live here. A missing environment variable, an absent
//! app setting or a machine name without a matching section is not an error:
//! the resolver treats those as an override that did not apply.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can escape configuration resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The configured global section is not present in the section store.
    #[error("No global section found: '{name}'")]
    GlobalSectionMissing { name: String },

    /// An override type name that does not map to any known mode.
    #[error("Unknown override type: '{0}' (expected chain, env, machine-name or app-setting)")]
    UnknownOverrideType(String),

    /// A section's values could not be turned into the requested model type.
    #[error("Section '{section}' does not fit the configuration model: {source}")]
    Deserialize {
        section: String,
        #[source]
        source: toml::de::Error,
    },

    /// The current model could not be converted back into a table for merging.
    #[error("Failed to serialize configuration model: {source}")]
    Serialize {
        #[source]
        source: toml::ser::Error,
    },

    /// Failed to read a backing file.
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A backing file is not valid TOML.
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The tool settings naming the default app settings file could not be loaded.
    #[error("Failed to load settings: {0}")]
    Settings(#[from] ConfigError),

    /// An app setting that cannot be represented as a plain string.
    #[error("Invalid app setting '{key}': {message}")]
    InvalidAppSetting { key: String, message: String },
}

impl ResolveError {
    /// Create a global-section-missing error.
    pub fn global_missing(name: impl Into<String>) -> Self {
        Self::GlobalSectionMissing { name: name.into() }
    }

    /// Create an invalid app setting error.
    pub fn invalid_app_setting(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAppSetting {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type for resolution operations.
pub type ResolveResult<T> = Result<T, ResolveError>;
