//! Mock providers for testing.
//!
//! Deterministic stand-ins for the host name, app settings and environment, so
//! resolution can be exercised without touching the real process state.
//! `MockAppSettings` also records every lookup, which makes it possible to
//! assert that a source was never consulted.

use super::traits::{AppSettingProvider, EnvironmentProvider, MachineNameProvider};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Machine name provider that always reports the same name.
#[derive(Debug, Clone)]
pub struct MockMachineName {
    name: String,
}

impl MockMachineName {
    /// Create a provider reporting `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MachineNameProvider for MockMachineName {
    fn machine_name(&self) -> String {
        self.name.clone()
    }
}

/// A lookup made against [`MockAppSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppSettingLookup {
    ContainsKey(String),
    Get(String),
}

#[derive(Debug, Default)]
struct MockAppSettingsState {
    values: HashMap<String, String>,
    lookups: Vec<AppSettingLookup>,
}

/// App settings provider with a lookup log.
///
/// Clones share state, so a clone handed to a resolver can be inspected
/// through the original.
///
/// # Example
/// ```
/// use config_overlay::provider::{AppSettingLookup, AppSettingProvider, MockAppSettings};
///
/// let settings = MockAppSettings::new().with("myoverridekey", "jonDevAppSettingTest");
/// assert!(settings.contains_key("myoverridekey"));
/// assert_eq!(
///     settings.lookups(),
///     vec![AppSettingLookup::ContainsKey("myoverridekey".to_string())]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockAppSettings {
    state: Arc<Mutex<MockAppSettingsState>>,
}

impl MockAppSettings {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a setting and return the provider.
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a setting.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.state.lock().values.insert(key.into(), value.into());
    }

    /// Every lookup made so far, in order.
    pub fn lookups(&self) -> Vec<AppSettingLookup> {
        self.state.lock().lookups.clone()
    }

    /// Forget recorded lookups.
    pub fn clear_lookups(&self) {
        self.state.lock().lookups.clear();
    }
}

impl AppSettingProvider for MockAppSettings {
    fn contains_key(&self, key: &str) -> bool {
        let mut state = self.state.lock();
        state
            .lookups
            .push(AppSettingLookup::ContainsKey(key.to_string()));
        state.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<String> {
        let mut state = self.state.lock();
        state.lookups.push(AppSettingLookup::Get(key.to_string()));
        state.values.get(key).cloned()
    }
}

/// In-memory environment.
#[derive(Debug, Clone, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    /// Create an environment with no variables set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable and return the environment.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
