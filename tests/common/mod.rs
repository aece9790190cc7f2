//! Shared test utilities for resolver tests.
//!
//! This module provides common test infrastructure including:
//! - The `DevSettings` model and a section store with the usual fixture sections
//! - A harness that wires mock providers into a resolver
//! - Assertion helpers for the global and override values

#![allow(dead_code)]

use config_overlay::provider::{MockAppSettings, MockEnvironment, MockMachineName};
use config_overlay::{ConfigurationResolver, OverrideType, ResolveResult, TomlSectionStore};
use serde::{Deserialize, Serialize};

/// The model every fixture section populates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DevSettings {
    pub connection_string_name: String,
    pub some_count: i64,
    pub some_path: String,
}

/// Sections used across the integration tests.
///
/// - `myenvvar` is what the environment override points at (count 6)
/// - `jonDevAppSettingTest` is what the app setting points at (count 7)
/// - `mymachineName` is the machine-name override (path `E:\work`)
pub const FIXTURE_SECTIONS: &str = r#"
[global]
ConnectionStringName = "valueabc"
SomeCount = 5
SomePath = 'C:\temp\mypath'

[myenvvar]
SomeCount = 6

[jonDevAppSettingTest]
SomeCount = 7

[mymachineName]
SomePath = 'E:\work'
"#;

/// Build a section store holding [`FIXTURE_SECTIONS`].
pub fn fixture_store() -> TomlSectionStore {
    TomlSectionStore::from_toml_str(FIXTURE_SECTIONS).expect("fixture sections parse")
}

/// The values of the `global` fixture section.
pub fn global_settings() -> DevSettings {
    DevSettings {
        connection_string_name: "valueabc".to_string(),
        some_count: 5,
        some_path: r"C:\temp\mypath".to_string(),
    }
}

/// Inputs for a resolver built entirely from mocks.
pub struct ResolverHarness {
    pub machine_name: String,
    pub app_settings: MockAppSettings,
    pub environment: MockEnvironment,
    pub override_type: OverrideType,
}

impl ResolverHarness {
    /// A harness with machine name `bob`, no app settings and no environment.
    pub fn new() -> Self {
        Self {
            machine_name: "bob".to_string(),
            app_settings: MockAppSettings::new(),
            environment: MockEnvironment::new(),
            override_type: OverrideType::Chain,
        }
    }

    pub fn machine_name(mut self, name: &str) -> Self {
        self.machine_name = name.to_string();
        self
    }

    pub fn app_setting(self, key: &str, value: &str) -> Self {
        self.app_settings.insert(key, value);
        self
    }

    pub fn env_var(mut self, name: &str, value: &str) -> Self {
        self.environment = self.environment.with(name, value);
        self
    }

    pub fn override_type(mut self, override_type: OverrideType) -> Self {
        self.override_type = override_type;
        self
    }

    /// Build a resolver over the fixture store.
    pub fn build(&self) -> ResolveResult<ConfigurationResolver<DevSettings>> {
        ConfigurationResolver::builder(fixture_store())
            .machine_name(MockMachineName::new(self.machine_name.clone()))
            .app_settings(self.app_settings.clone())
            .environment(self.environment.clone())
            .override_type(self.override_type)
            .build()
    }
}
