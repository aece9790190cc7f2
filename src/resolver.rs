//! Override resolution.
//!
//! The `ConfigurationResolver` builds a typed model from the global section and
//! then applies at most one override section, chosen by its `OverrideType`.
//!
//! # Chain order
//!
//! In `OverrideType::Chain` the sources are tried in this order, and the first
//! one that applies wins:
//!
//! 1. Environment variable named by the override key
//! 2. App setting stored under the override key
//! 3. Section named after the current machine
//!
//! A source that names a section the store does not have counts as "did not
//! apply", so the chain moves on to the next source.

use crate::error::{ResolveError, ResolveResult};
use crate::provider::{
    AppSettingProvider, AppSettings, EnvironmentProvider, MachineNameProvider, ProcessEnvironment,
    SystemMachineName,
};
use crate::section::{Section, SectionStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Default name of the global section.
pub const DEFAULT_GLOBAL_SECTION: &str = "global";

/// How the override section is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OverrideType {
    /// Environment variable, then app setting, then machine name.
    #[default]
    Chain,
    /// Section named by the environment variable the override key names.
    EnvironmentalVariable,
    /// Section named after the current machine.
    MachineName,
    /// Section named by the app setting stored under the override key.
    AppSettingKey,
}

impl OverrideType {
    /// Canonical kebab-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chain => "chain",
            Self::EnvironmentalVariable => "environmental-variable",
            Self::MachineName => "machine-name",
            Self::AppSettingKey => "app-setting-key",
        }
    }
}

impl fmt::Display for OverrideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverrideType {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "chain" => Ok(Self::Chain),
            "env" | "environment" | "environment-variable" | "environmental-variable" => {
                Ok(Self::EnvironmentalVariable)
            }
            "machine" | "machine-name" => Ok(Self::MachineName),
            "app-setting" | "app-setting-key" | "appsetting" => Ok(Self::AppSettingKey),
            _ => Err(ResolveError::UnknownOverrideType(s.to_string())),
        }
    }
}

impl TryFrom<String> for OverrideType {
    type Error = ResolveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OverrideType> for String {
    fn from(value: OverrideType) -> Self {
        value.as_str().to_string()
    }
}

/// A source an override section can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverrideSource {
    EnvironmentVariable,
    AppSetting,
    MachineName,
}

impl OverrideSource {
    /// Sources in the order `OverrideType::Chain` tries them.
    pub const CHAIN: [OverrideSource; 3] = [
        OverrideSource::EnvironmentVariable,
        OverrideSource::AppSetting,
        OverrideSource::MachineName,
    ];
}

impl fmt::Display for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvironmentVariable => write!(f, "environment variable"),
            Self::AppSetting => write!(f, "app setting"),
            Self::MachineName => write!(f, "machine name"),
        }
    }
}

/// The override that was applied during a resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOverride {
    pub source: OverrideSource,
    pub section: String,
}

/// A resolved model together with the override that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub model: T,
    /// `None` when the model holds only global values.
    pub applied: Option<AppliedOverride>,
}

/// Resolves a typed configuration model from a global section plus at most one
/// override section.
///
/// The resolver holds only immutable state and is `Send + Sync`, so a single
/// instance can serve concurrent callers.
///
/// # Example
/// ```
/// use config_overlay::{ConfigurationResolver, OverrideType, TomlSectionStore};
/// use config_overlay::provider::{MockAppSettings, MockEnvironment, MockMachineName};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Serialize, Deserialize)]
/// #[serde(rename_all = "PascalCase")]
/// struct DevSettings {
///     some_count: i64,
/// }
///
/// let store = TomlSectionStore::from_toml_str(
///     "[global]\nSomeCount = 5\n\n[jonDevAppSettingTest]\nSomeCount = 7\n",
/// )?;
/// let resolver = ConfigurationResolver::<DevSettings>::builder(store)
///     .machine_name(MockMachineName::new("bob"))
///     .app_settings(MockAppSettings::new().with("myoverridekey", "jonDevAppSettingTest"))
///     .environment(MockEnvironment::new())
///     .override_type(OverrideType::AppSettingKey)
///     .build()?;
///
/// assert_eq!(resolver.resolve("myoverridekey")?.some_count, 7);
/// assert_eq!(resolver.resolve("")?.some_count, 5);
/// # Ok::<(), config_overlay::ResolveError>(())
/// ```
pub struct ConfigurationResolver<T> {
    store: Arc<dyn SectionStore>,
    global: Section,
    machine_name: Arc<dyn MachineNameProvider>,
    app_settings: Arc<dyn AppSettingProvider>,
    environment: Arc<dyn EnvironmentProvider>,
    override_type: OverrideType,
    _model: PhantomData<fn() -> T>,
}

impl<T> ConfigurationResolver<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Create a resolver from explicit collaborators.
    ///
    /// # Errors
    ///
    /// - `ResolveError::GlobalSectionMissing` if the store has no section
    ///   named `global_section_name`
    pub fn new(
        store: Arc<dyn SectionStore>,
        machine_name: Arc<dyn MachineNameProvider>,
        app_settings: Arc<dyn AppSettingProvider>,
        environment: Arc<dyn EnvironmentProvider>,
        global_section_name: &str,
        override_type: OverrideType,
    ) -> ResolveResult<Self> {
        let global = store
            .section(global_section_name)
            .ok_or_else(|| ResolveError::global_missing(global_section_name))?;

        debug!(
            "Resolver ready: global section '{}', override type {}",
            global_section_name, override_type
        );

        Ok(Self {
            store,
            global,
            machine_name,
            app_settings,
            environment,
            override_type,
            _model: PhantomData,
        })
    }

    /// Create a resolver over `store` that reads the real host name, process
    /// environment and app settings file, uses the `"global"` section and
    /// chains all sources.
    ///
    /// See [`AppSettings::load_default`] for where the app settings come from.
    pub fn with_defaults(store: impl SectionStore + 'static) -> ResolveResult<Self> {
        Self::builder(store).build()
    }

    /// Start building a resolver over `store`.
    pub fn builder(store: impl SectionStore + 'static) -> ResolverBuilder<T> {
        ResolverBuilder::new(store)
    }

    /// Name of the global section.
    pub fn global_section_name(&self) -> &str {
        self.global.name()
    }

    /// The override type this resolver was built with.
    pub fn override_type(&self) -> OverrideType {
        self.override_type
    }

    /// Resolve the model for `override_key`.
    ///
    /// Overrides that cannot be found are skipped; the returned model always
    /// carries at least the global section's values. Pass `""` when there is
    /// no key (only the machine name source can apply then).
    pub fn resolve(&self, override_key: &str) -> ResolveResult<T> {
        self.resolve_detailed(override_key)
            .map(|resolved| resolved.model)
    }

    /// Resolve the model and report which override, if any, was applied.
    pub fn resolve_detailed(&self, override_key: &str) -> ResolveResult<Resolved<T>> {
        let mut model: T = self.global.create()?;

        let applied = match self.override_type {
            OverrideType::Chain => self.apply_chain(&mut model, override_key)?,
            OverrideType::EnvironmentalVariable => {
                self.apply(OverrideSource::EnvironmentVariable, &mut model, override_key)?
            }
            OverrideType::MachineName => {
                self.apply(OverrideSource::MachineName, &mut model, override_key)?
            }
            OverrideType::AppSettingKey => {
                self.apply(OverrideSource::AppSetting, &mut model, override_key)?
            }
        };

        match &applied {
            Some(applied) => info!(
                "Applied section '{}' over '{}' from {}",
                applied.section,
                self.global.name(),
                applied.source
            ),
            None => debug!("No override applied; using '{}' only", self.global.name()),
        }

        Ok(Resolved { model, applied })
    }

    fn apply_chain(
        &self,
        model: &mut T,
        override_key: &str,
    ) -> ResolveResult<Option<AppliedOverride>> {
        for source in OverrideSource::CHAIN {
            if let Some(applied) = self.apply(source, model, override_key)? {
                return Ok(Some(applied));
            }
        }
        Ok(None)
    }

    /// Try a single source. `Ok(None)` means the source did not apply and
    /// `model` is unchanged.
    fn apply(
        &self,
        source: OverrideSource,
        model: &mut T,
        override_key: &str,
    ) -> ResolveResult<Option<AppliedOverride>> {
        let section_name = match source {
            OverrideSource::EnvironmentVariable => self.section_name_from_environment(override_key),
            OverrideSource::AppSetting => self.section_name_from_app_setting(override_key),
            OverrideSource::MachineName => self.section_name_from_machine(),
        };

        let Some(section_name) = section_name else {
            debug!("No section name from {}", source);
            return Ok(None);
        };

        if !self.populate_model(model, &section_name)? {
            debug!(
                "{} named section '{}', which does not exist",
                source, section_name
            );
            return Ok(None);
        }

        Ok(Some(AppliedOverride {
            source,
            section: section_name,
        }))
    }

    fn section_name_from_environment(&self, override_key: &str) -> Option<String> {
        if is_blank(override_key) {
            return None;
        }
        self.environment
            .get(override_key)
            .filter(|value| !is_blank(value))
    }

    fn section_name_from_app_setting(&self, override_key: &str) -> Option<String> {
        if is_blank(override_key) {
            return None;
        }
        if !self.app_settings.contains_key(override_key) {
            return None;
        }
        self.app_settings.get(override_key)
    }

    fn section_name_from_machine(&self) -> Option<String> {
        let machine_name = self.machine_name.machine_name();
        if !self.store.contains_section(&machine_name) {
            return None;
        }
        Some(machine_name)
    }

    fn populate_model(&self, model: &mut T, section_name: &str) -> ResolveResult<bool> {
        let Some(section) = self.store.section(section_name) else {
            return Ok(false);
        };
        section.populate(model)?;
        Ok(true)
    }
}

impl<T> fmt::Debug for ConfigurationResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationResolver")
            .field("global_section", &self.global.name())
            .field("override_type", &self.override_type)
            .field("store", &self.store)
            .finish()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Builder for [`ConfigurationResolver`].
///
/// Unset collaborators fall back to [`SystemMachineName`],
/// [`AppSettings::load_default`] and [`ProcessEnvironment`].
pub struct ResolverBuilder<T> {
    store: Arc<dyn SectionStore>,
    machine_name: Option<Arc<dyn MachineNameProvider>>,
    app_settings: Option<Arc<dyn AppSettingProvider>>,
    environment: Option<Arc<dyn EnvironmentProvider>>,
    global_section_name: String,
    override_type: OverrideType,
    _model: PhantomData<fn() -> T>,
}

impl<T> ResolverBuilder<T>
where
    T: Serialize + DeserializeOwned,
{
    fn new(store: impl SectionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            machine_name: None,
            app_settings: None,
            environment: None,
            global_section_name: DEFAULT_GLOBAL_SECTION.to_string(),
            override_type: OverrideType::default(),
            _model: PhantomData,
        }
    }

    /// Use a specific machine name provider.
    pub fn machine_name(mut self, provider: impl MachineNameProvider + 'static) -> Self {
        self.machine_name = Some(Arc::new(provider));
        self
    }

    /// Use a specific app settings provider.
    pub fn app_settings(mut self, provider: impl AppSettingProvider + 'static) -> Self {
        self.app_settings = Some(Arc::new(provider));
        self
    }

    /// Use a specific environment provider.
    pub fn environment(mut self, provider: impl EnvironmentProvider + 'static) -> Self {
        self.environment = Some(Arc::new(provider));
        self
    }

    /// Name of the global section (default `"global"`).
    pub fn global_section(mut self, name: impl Into<String>) -> Self {
        self.global_section_name = name.into();
        self
    }

    /// Override selection policy (default `Chain`).
    pub fn override_type(mut self, override_type: OverrideType) -> Self {
        self.override_type = override_type;
        self
    }

    /// Build the resolver.
    ///
    /// # Errors
    ///
    /// - `ResolveError::GlobalSectionMissing` if the global section does not exist
    pub fn build(self) -> ResolveResult<ConfigurationResolver<T>> {
        ConfigurationResolver::new(
            self.store,
            self.machine_name
                .unwrap_or_else(|| Arc::new(SystemMachineName::new())),
            match self.app_settings {
                Some(provider) => provider,
                None => Arc::new(AppSettings::load_default()?),
            },
            self.environment
                .unwrap_or_else(|| Arc::new(ProcessEnvironment::new())),
            &self.global_section_name,
            self.override_type,
        )
    }
}
