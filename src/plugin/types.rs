//! Type definitions for the plugin system
//!
//! Plugin metadata, the value returned from activation, and the settings and
//! services handed to builtin plugins.

use crate::registry::api::{AppRegistry, StoreHandle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Plugin metadata information
#[derive(Debug, Clone, PartialEq)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub api_version: u32,
}

impl PluginInfo {
    /// Metadata for a plugin built against this crate's plugin API
    pub fn current(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            api_version: crate::core::version::get_api_version(),
        }
    }
}

pub(crate) type DeactivateHook = Box<dyn FnOnce() + Send + 'static>;

/// What a plugin hands back from a successful activation
pub struct Activation {
    pub store: StoreHandle,
    pub(crate) deactivate: Option<DeactivateHook>,
}

impl Activation {
    pub fn new(store: StoreHandle) -> Self {
        Self {
            store,
            deactivate: None,
        }
    }

    /// Activation for plugins with no state to expose
    pub fn without_store() -> Self {
        Self::new(StoreHandle::empty())
    }

    /// Attach the plugin's own teardown hook
    ///
    /// It runs after every listener and cleanup registered through the
    /// activation helpers, and before the abort signal fires.
    pub fn with_deactivate(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.deactivate = Some(Box::new(hook));
        self
    }

    pub fn has_deactivate(&self) -> bool {
        self.deactivate.is_some()
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Activation")
            .field("store", &self.store)
            .field("deactivate", &self.deactivate.is_some())
            .finish()
    }
}

/// Which registry a builtin plugin listens on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RegistryTarget {
    #[default]
    Global,
    Local,
}

/// Per-plugin settings, usually read from a `[[plugin]]` config table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginSettings {
    pub name: String,
    #[serde(default)]
    pub events: Vec<String>,
    #[serde(default)]
    pub scope: RegistryTarget,
    /// Stop handling events after this many have been seen
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PluginSettings {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
            scope: RegistryTarget::default(),
            limit: None,
        }
    }

    pub fn with_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scope(mut self, scope: RegistryTarget) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Registries a builtin plugin is activated with
#[derive(Debug, Clone)]
pub struct BuiltinServices {
    pub global: Arc<AppRegistry>,
    pub local: Arc<AppRegistry>,
}

impl BuiltinServices {
    pub fn new(global: Arc<AppRegistry>, local: Arc<AppRegistry>) -> Self {
        Self { global, local }
    }

    pub fn registry_for(&self, target: RegistryTarget) -> &Arc<AppRegistry> {
        match target {
            RegistryTarget::Global => &self.global,
            RegistryTarget::Local => &self.local,
        }
    }
}
