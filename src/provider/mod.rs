//! Override source providers.
//!
//! Provides the capability traits the resolver consults, plus system-backed
//! and mock implementations, enabling dependency injection and testing.

pub mod app_settings;
pub mod mock;
pub mod system;
pub mod traits;

pub use app_settings::{AppSettings, DEFAULT_APP_SETTINGS_FILE};
pub use mock::{AppSettingLookup, MockAppSettings, MockEnvironment, MockMachineName};
pub use system::{ProcessEnvironment, SystemMachineName};
pub use traits::*;
