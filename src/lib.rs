//! Config Overlay Library
//!
//! Resolves a strongly-typed configuration model from a base "global" section
//! plus at most one override section, chosen at runtime from an environment
//! variable, an app setting, or the current machine name.
//!
//! # Modules
//!
//! - `resolver`: the override resolution algorithm and `OverrideType`
//! - `section`: named sections and the TOML-backed section store
//! - `provider`: machine name, app settings and environment providers
//! - `config`: settings for the `config-overlay` command-line tool
//! - `error`: resolution error types

pub mod config;
pub mod error;
pub mod provider;
pub mod resolver;
pub mod section;

// Re-export commonly used types for convenience
pub use error::{ResolveError, ResolveResult};
pub use provider::{
    AppSettingProvider, AppSettings, EnvironmentProvider, MachineNameProvider, ProcessEnvironment,
    SystemMachineName,
};
pub use resolver::{
    AppliedOverride, ConfigurationResolver, OverrideSource, OverrideType, Resolved,
    ResolverBuilder, DEFAULT_GLOBAL_SECTION,
};
pub use section::{Section, SectionStore, TomlSectionStore};
