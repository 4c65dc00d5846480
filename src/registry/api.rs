//! Public API for the app registry
//!
//! External modules should import from here rather than directly from internal modules.

use std::sync::{Arc, LazyLock};

pub use crate::registry::app_registry::{ActivePlugin, AppRegistry, RegistryKind};
pub use crate::registry::handles::{ComponentHandle, StoreHandle};
pub use crate::registry::keyed::{ComponentRegistry, KeyedRegistry, StoreRegistry};
pub use crate::registry::names::{ComponentName, PluginInstanceId, RoleName, StoreName};
pub use crate::registry::roles::{RoleEntry, RoleRegistry};

/// Global app registry instance
///
/// Created once per process on first access and never replaced. Hosting code
/// that needs isolation (tests, embedded shells) should pass its own
/// `AppRegistry::new_global()` wherever a global registry is accepted instead
/// of touching this one.
static GLOBAL_APP_REGISTRY: LazyLock<Arc<AppRegistry>> = LazyLock::new(|| {
    log::trace!("Initializing global app registry");
    Arc::new(AppRegistry::new_global())
});

/// Access the process-wide app registry
///
/// Each call returns the same shared instance.
pub fn global_app_registry() -> Arc<AppRegistry> {
    GLOBAL_APP_REGISTRY.clone()
}
