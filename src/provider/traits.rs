//! Capability traits for the override sources.
//!
//! Each source the resolver can consult sits behind one of these traits, so
//! the process environment, host name and app-settings store can be swapped
//! for deterministic implementations in tests.

/// Reports the identifier of the current host.
#[cfg_attr(test, mockall::automock)]
pub trait MachineNameProvider: Send + Sync {
    /// The current machine name. May be empty if it cannot be determined.
    fn machine_name(&self) -> String;
}

/// Key/value application settings.
#[cfg_attr(test, mockall::automock)]
pub trait AppSettingProvider: Send + Sync {
    /// Whether the key is present.
    fn contains_key(&self, key: &str) -> bool;

    /// The value stored under the key, if any.
    fn get(&self, key: &str) -> Option<String>;
}

/// Read access to environment variables.
#[cfg_attr(test, mockall::automock)]
pub trait EnvironmentProvider: Send + Sync {
    /// The value of the named variable, or `None` if it is unset.
    fn get(&self, name: &str) -> Option<String>;
}
