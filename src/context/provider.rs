//! Registry provider scopes
//!
//! A host shell nests UI regions; each region sees the process-wide global
//! registry plus one local registry. The root scope's local registry is the
//! global registry itself. Child scopes either create a fresh local registry,
//! adopt one handed to them, or borrow one whose lifetime stays with the
//! caller.

use crate::core::error_handling::ContextualError;
use crate::core::sync::lock_or_recover;
use crate::plugin::api::{Plugin, PluginError, PluginLifecycleScope};
use crate::registry::api::{global_app_registry, AppRegistry, ComponentHandle, ComponentName, RoleEntry, RoleName};
use std::fmt;
use std::sync::{Arc, Mutex};
use strum_macros::Display;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("No local app registry: the provider scope has been unmounted")]
    NoLocalRegistry,

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

impl ContextualError for ContextError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ContextError::NoLocalRegistry => false,
            ContextError::Plugin(error) => error.is_user_actionable(),
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            ContextError::NoLocalRegistry => None,
            ContextError::Plugin(error) => error.user_message(),
        }
    }
}

/// How a child scope obtains its local registry
pub enum LocalRegistry {
    /// Create a fresh registry owned by the scope
    Create,
    /// Take over a registry; the scope deactivates it on unmount
    Adopt(Arc<AppRegistry>),
    /// Use a registry the caller keeps owning; never deactivated by the scope
    Borrow(Arc<AppRegistry>),
}

/// Who is responsible for deactivating a scope's local registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Ownership {
    OwnedByScope,
    OwnedByCreator,
}

pub struct ProviderScope {
    global: Arc<AppRegistry>,
    local: Mutex<Option<Arc<AppRegistry>>>,
    ownership: Ownership,
}

impl fmt::Debug for ProviderScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderScope")
            .field("global", &self.global.label())
            .field(
                "local",
                &lock_or_recover(&self.local, "provider local registry")
                    .as_ref()
                    .map(|registry| registry.label().to_string()),
            )
            .field("ownership", &self.ownership)
            .finish()
    }
}

impl ProviderScope {
    /// Top-level scope over `global`; its local registry is `global` itself
    pub fn root(global: Arc<AppRegistry>) -> Self {
        Self {
            local: Mutex::new(Some(Arc::clone(&global))),
            global,
            ownership: Ownership::OwnedByCreator,
        }
    }

    /// Top-level scope over the process-wide global registry
    pub fn root_default() -> Self {
        Self::root(global_app_registry())
    }

    /// Nested scope sharing this scope's global registry
    pub fn child(&self, local: LocalRegistry) -> Self {
        let (registry, ownership) = match local {
            LocalRegistry::Create => (Arc::new(AppRegistry::new_local()), Ownership::OwnedByScope),
            LocalRegistry::Adopt(registry) => (registry, Ownership::OwnedByScope),
            LocalRegistry::Borrow(registry) => (registry, Ownership::OwnedByCreator),
        };
        log::debug!(
            "Mounting provider scope with local registry '{}' ({})",
            registry.label(),
            ownership
        );
        Self {
            global: Arc::clone(&self.global),
            local: Mutex::new(Some(registry)),
            ownership,
        }
    }

    pub fn global_registry(&self) -> Arc<AppRegistry> {
        Arc::clone(&self.global)
    }

    pub fn local_registry(&self) -> Result<Arc<AppRegistry>, ContextError> {
        lock_or_recover(&self.local, "provider local registry")
            .clone()
            .ok_or(ContextError::NoLocalRegistry)
    }

    pub fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub fn is_mounted(&self) -> bool {
        lock_or_recover(&self.local, "provider local registry").is_some()
    }

    /// Release the local registry, deactivating it if this scope owns it
    pub fn unmount(&self) {
        let Some(registry) = lock_or_recover(&self.local, "provider local registry").take() else {
            return;
        };
        log::debug!(
            "Unmounting provider scope with local registry '{}' ({})",
            registry.label(),
            self.ownership
        );
        if self.ownership == Ownership::OwnedByScope {
            registry.deactivate();
        }
    }

    /// Look up a component on the global registry
    pub fn component(&self, name: impl Into<ComponentName>) -> Option<ComponentHandle> {
        let name = name.into();
        let component = self.global.get_component(&name);
        if component.is_none() {
            log::debug!("Component '{}' is not registered", name);
        }
        component
    }

    /// Look up a role on the global registry
    pub fn role(&self, name: impl Into<RoleName>) -> Option<Vec<RoleEntry>> {
        let name = name.into();
        let role = self.global.get_role(&name);
        if role.is_none() {
            log::debug!("Role '{}' is not registered", name);
        }
        role
    }

    /// Activate `plugin` against this scope's local registry
    pub fn activate_plugin<P>(
        &self,
        plugin: &P,
        initial: P::Initial,
        services: P::Services,
    ) -> Result<Arc<PluginLifecycleScope>, ContextError>
    where
        P: Plugin + ?Sized,
    {
        let registry = self.local_registry()?;
        let scope = PluginLifecycleScope::new(plugin.info().name);
        scope.activate(plugin, &registry, initial, services)?;
        Ok(scope)
    }
}

impl Drop for ProviderScope {
    fn drop(&mut self) {
        self.unmount();
    }
}
