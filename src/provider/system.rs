//! Providers backed by the running process and host.
//!
//! These are the only types in the crate that read ambient process state.

use super::traits::{EnvironmentProvider, MachineNameProvider};

/// Machine name taken from the operating system.
///
/// The name is truncated at the first `.`, so `build-07.corp.example` is
/// reported as `build-07`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemMachineName;

impl SystemMachineName {
    /// Create a new system machine name provider.
    pub fn new() -> Self {
        Self
    }
}

impl MachineNameProvider for SystemMachineName {
    fn machine_name(&self) -> String {
        let full = host_name().unwrap_or_default();
        match full.split_once('.') {
            Some((short, _)) => short.to_string(),
            None => full,
        }
    }
}

fn host_name() -> Option<String> {
    hostname::get()
        .ok()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Environment variables of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl ProcessEnvironment {
    /// Create a new process environment provider.
    pub fn new() -> Self {
        Self
    }
}

impl EnvironmentProvider for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        // `std::env::var` rejects names containing '=' or NUL; treat those as unset.
        if name.is_empty() || name.contains(['=', '\0']) {
            return None;
        }
        std::env::var(name).ok()
    }
}
