//! Named configuration sections.
//!
//! Provides the `SectionStore` abstraction the resolver reads from, and a
//! TOML-backed implementation.

pub mod toml_store;
pub mod traits;

pub use toml_store::TomlSectionStore;
pub use traits::{Section, SectionStore};
