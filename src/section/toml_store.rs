//! TOML-backed section store.
//!
//! Every top-level table of a TOML document becomes one section:
//!
//! ```toml
//! [global]
//! ConnectionStringName = "valueabc"
//! SomeCount = 5
//!
//! [jonDevAppSettingTest]
//! SomeCount = 7
//! ```

use super::traits::{Section, SectionStore};
use crate::error::{ResolveError, ResolveResult};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Section store holding the tables of a TOML document in memory.
#[derive(Debug, Clone, Default)]
pub struct TomlSectionStore {
    /// File the sections were loaded from, if any.
    path: Option<PathBuf>,
    sections: BTreeMap<String, toml::Table>,
}

impl TomlSectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a store from TOML text.
    pub fn from_toml_str(content: &str) -> ResolveResult<Self> {
        let document = content
            .parse::<toml::Table>()
            .map_err(|source| ResolveError::Parse {
                path: PathBuf::from("<inline>"),
                source,
            })?;
        Ok(Self::from_document(document, None))
    }

    /// Load a store from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> ResolveResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ResolveError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let document = content
            .parse::<toml::Table>()
            .map_err(|source| ResolveError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let store = Self::from_document(document, Some(path.to_path_buf()));
        debug!(
            "Loaded {} section(s) from {}",
            store.sections.len(),
            path.display()
        );
        Ok(store)
    }

    /// Build a store from already constructed sections.
    pub fn from_sections(sections: impl IntoIterator<Item = Section>) -> Self {
        let mut store = Self::new();
        for section in sections {
            store.insert(section);
        }
        store
    }

    /// Add or replace a section.
    pub fn insert(&mut self, section: Section) -> &mut Self {
        let name = section.name().to_string();
        self.sections.insert(name, section.into_values());
        self
    }

    /// The file this store was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of sections held.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the store holds no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    fn from_document(document: toml::Table, path: Option<PathBuf>) -> Self {
        let mut sections = BTreeMap::new();
        for (name, value) in document {
            match value {
                toml::Value::Table(table) => {
                    sections.insert(name, table);
                }
                other => {
                    // Bare keys outside any table do not belong to a section.
                    warn!(
                        "Ignoring top-level key '{}' ({}): only tables are sections",
                        name,
                        other.type_str()
                    );
                }
            }
        }
        Self { path, sections }
    }
}

impl SectionStore for TomlSectionStore {
    fn section_names(&self) -> BTreeSet<String> {
        self.sections.keys().cloned().collect()
    }

    fn section(&self, name: &str) -> Option<Section> {
        self.sections
            .get(name)
            .map(|values| Section::new(name, values.clone()))
    }
}
