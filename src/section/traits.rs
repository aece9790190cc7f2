//! Core section types.
//!
//! Defines the `SectionStore` trait that lets file-backed stores and in-memory
//! fixtures be used interchangeably, and the `Section` value they hand out.

use crate::error::{ResolveError, ResolveResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// A named group of configuration values.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    name: String,
    values: toml::Table,
}

impl Section {
    /// Create a section from a name and its values.
    pub fn new(name: impl Into<String>, values: toml::Table) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Parse a section body from TOML text.
    pub fn from_toml_str(name: impl Into<String>, body: &str) -> ResolveResult<Self> {
        let name = name.into();
        let values = body
            .parse::<toml::Table>()
            .map_err(|source| ResolveError::Parse {
                path: PathBuf::from(format!("<section {name}>")),
                source,
            })?;
        Ok(Self { name, values })
    }

    /// The section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw values held by this section.
    pub fn values(&self) -> &toml::Table {
        &self.values
    }

    /// Consume the section and return its values.
    pub fn into_values(self) -> toml::Table {
        self.values
    }

    /// Build a fresh model instance from this section's values.
    pub fn create<T>(&self) -> ResolveResult<T>
    where
        T: DeserializeOwned,
    {
        toml::Value::Table(self.values.clone())
            .try_into()
            .map_err(|source| ResolveError::Deserialize {
                section: self.name.clone(),
                source,
            })
    }

    /// Merge this section's values onto an existing model instance.
    ///
    /// Keys present in the section replace the instance's values; nested tables
    /// are merged key by key. Keys the section does not mention keep whatever
    /// the instance already held. On error the instance is left untouched.
    pub fn populate<T>(&self, instance: &mut T) -> ResolveResult<()>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut merged = match toml::Value::try_from(&*instance) {
            Ok(toml::Value::Table(table)) => table,
            Ok(other) => {
                return Err(ResolveError::Serialize {
                    source: <toml::ser::Error as serde::ser::Error>::custom(format!(
                        "model serialized to a {} instead of a table",
                        other.type_str()
                    )),
                })
            }
            Err(source) => return Err(ResolveError::Serialize { source }),
        };

        merge_tables(&mut merged, &self.values);

        *instance = toml::Value::Table(merged)
            .try_into()
            .map_err(|source| ResolveError::Deserialize {
                section: self.name.clone(),
                source,
            })?;
        Ok(())
    }
}

/// Recursively overlay `overlay` onto `base`.
pub(crate) fn merge_tables(base: &mut toml::Table, overlay: &toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Trait for named-section configuration stores.
///
/// The resolver only ever reads from a store, so implementations must be safe
/// to share across threads.
pub trait SectionStore: Send + Sync + std::fmt::Debug {
    /// Names of every section the store holds.
    fn section_names(&self) -> BTreeSet<String>;

    /// Look up a section by exact name.
    fn section(&self, name: &str) -> Option<Section>;

    /// Whether a section with this exact name exists.
    fn contains_section(&self, name: &str) -> bool {
        self.section_names().contains(name)
    }
}
