//! Settings for the `config-overlay` command-line tool.
//!
//! This module provides TOML-based settings with environment variable overrides.
//! It configures the tool itself (which files to read, which section is global,
//! how overrides are chosen); the application configuration being resolved
//! lives in the section store.
//!
//! # Settings Resolution
//!
//! Settings are loaded from the following locations (in order of priority):
//!
//! 1. `CONFIG_OVERLAY_SETTINGS` environment variable (explicit path)
//! 2. `./config-overlay.toml` (current directory)
//! 3. `config-overlay.toml` in the platform config directory
//! 4. Built-in defaults (no file required)
//!
//! # Environment Overrides
//!
//! - `CONFIG_OVERLAY_GLOBAL_SECTION`, `CONFIG_OVERLAY_OVERRIDE_TYPE`,
//!   `CONFIG_OVERLAY_OVERRIDE_KEY`
//! - `CONFIG_OVERLAY_SECTIONS_FILE`, `CONFIG_OVERLAY_APP_SETTINGS_FILE`
//! - `CONFIG_OVERLAY_LOG_LEVEL`, `CONFIG_OVERLAY_LOG_FORMAT`
//!
//! # Example
//!
//! ```rust,no_run
//! use config_overlay::config::SettingsLoader;
//!
//! let loader = SettingsLoader::load()?;
//! println!("Global section: {}", loader.settings().resolver.global_section);
//! # Ok::<(), config_overlay::config::ConfigError>(())
//! ```

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{default_settings_path, resolve_settings_path, SettingsLoader};
pub use schema::{LogFormat, LoggingConfig, ResolverSettings, Settings, SourceSettings};
