//! AppRegistry implementation

use crate::core::cleanup::Disposer;
use crate::core::sync::{lock_or_recover, read_or_recover, write_or_recover};
use crate::events::bus::{EventBus, EventTarget, Handler, HandlerResult};
use crate::registry::handles::{ComponentHandle, StoreHandle};
use crate::registry::keyed::{ComponentRegistry, StoreRegistry};
use crate::registry::names::{ComponentName, PluginInstanceId, RoleName, StoreName};
use crate::registry::roles::{RoleEntry, RoleRegistry};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use strum_macros::Display;

/// Whether a registry is the process-wide one or belongs to a UI scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RegistryKind {
    Global,
    Local,
}

/// A plugin activated against a registry
///
/// The registry keeps these so that deactivating the registry also
/// deactivates every plugin still running on it.
pub trait ActivePlugin: Send + Sync {
    fn instance_id(&self) -> PluginInstanceId;

    fn plugin_name(&self) -> &str;

    /// Tear the plugin down; must be idempotent
    fn deactivate(&self);
}

/// Composite registry: event bus, components, roles, stores and active plugins
pub struct AppRegistry {
    kind: RegistryKind,
    label: String,
    bus: EventBus,
    components: RwLock<ComponentRegistry>,
    roles: RwLock<RoleRegistry>,
    stores: RwLock<StoreRegistry>,
    plugins: Mutex<BTreeMap<PluginInstanceId, Arc<dyn ActivePlugin>>>,
}

impl fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRegistry")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("events", &self.bus.event_names())
            .field("components", &self.component_names())
            .field("roles", &self.role_names())
            .field("stores", &self.store_names())
            .field("plugins", &self.plugin_ids())
            .finish()
    }
}

impl AppRegistry {
    fn with_kind(kind: RegistryKind) -> Self {
        static NEXT_LOCAL: AtomicU64 = AtomicU64::new(1);
        let label = match kind {
            RegistryKind::Global => "global".to_string(),
            RegistryKind::Local => format!("local-{}", NEXT_LOCAL.fetch_add(1, Ordering::Relaxed)),
        };
        log::debug!("Creating {} app registry '{}'", kind, label);
        Self {
            kind,
            bus: EventBus::new(label.clone()),
            label,
            components: RwLock::new(ComponentRegistry::new()),
            roles: RwLock::new(RoleRegistry::new()),
            stores: RwLock::new(StoreRegistry::new()),
            plugins: Mutex::new(BTreeMap::new()),
        }
    }

    /// Create a registry with global semantics
    ///
    /// The process-wide instance lives behind `global_app_registry()`; this
    /// constructor exists so hosts and tests can inject their own.
    pub fn new_global() -> Self {
        Self::with_kind(RegistryKind::Global)
    }

    /// Create a registry for one UI scope
    pub fn new_local() -> Self {
        Self::with_kind(RegistryKind::Local)
    }

    pub fn kind(&self) -> RegistryKind {
        self.kind
    }

    pub fn is_global(&self) -> bool {
        self.kind == RegistryKind::Global
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The registry's event bus
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // Events

    pub fn on<F>(&self, event: &str, handler: F) -> Disposer
    where
        F: Fn(&[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        self.bus.on(event, handler)
    }

    pub fn once<F>(&self, event: &str, handler: F) -> Disposer
    where
        F: Fn(&[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        self.bus.once(event, handler)
    }

    pub fn emit(&self, event: &str, args: &[Value]) -> usize {
        self.bus.emit(event, args)
    }

    pub fn remove_all_listeners(&self, event: Option<&str>) {
        self.bus.remove_all_listeners(event);
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.bus.listener_count(event)
    }

    // Components

    /// Register a component; an existing registration under the same name is replaced
    pub fn register_component(
        &self,
        name: impl Into<ComponentName>,
        component: ComponentHandle,
    ) -> Option<ComponentHandle> {
        write_or_recover(&self.components, "registry components").register(name.into(), component)
    }

    pub fn deregister_component(&self, name: impl Into<ComponentName>) -> Option<ComponentHandle> {
        write_or_recover(&self.components, "registry components").deregister(&name.into())
    }

    pub fn get_component(&self, name: impl Into<ComponentName>) -> Option<ComponentHandle> {
        read_or_recover(&self.components, "registry components").get(&name.into())
    }

    pub fn component_names(&self) -> Vec<ComponentName> {
        read_or_recover(&self.components, "registry components").names()
    }

    // Roles

    pub fn register_role(&self, role: impl Into<RoleName>, entry: RoleEntry) {
        write_or_recover(&self.roles, "registry roles").register(role.into(), entry);
    }

    /// Remove every entry of `role` named `name`; the role stays registered
    pub fn deregister_role(&self, role: impl Into<RoleName>, name: &str) -> usize {
        write_or_recover(&self.roles, "registry roles").deregister(&role.into(), name)
    }

    /// `None` if the role was never registered, possibly empty otherwise
    pub fn get_role(&self, role: impl Into<RoleName>) -> Option<Vec<RoleEntry>> {
        read_or_recover(&self.roles, "registry roles").get(&role.into())
    }

    pub fn role_names(&self) -> Vec<RoleName> {
        read_or_recover(&self.roles, "registry roles").names()
    }

    // Stores

    pub fn register_store(&self, name: impl Into<StoreName>, store: StoreHandle) -> Option<StoreHandle> {
        write_or_recover(&self.stores, "registry stores").register(name.into(), store)
    }

    pub fn deregister_store(&self, name: impl Into<StoreName>) -> Option<StoreHandle> {
        write_or_recover(&self.stores, "registry stores").deregister(&name.into())
    }

    pub fn get_store(&self, name: impl Into<StoreName>) -> Option<StoreHandle> {
        read_or_recover(&self.stores, "registry stores").get(&name.into())
    }

    pub fn store_names(&self) -> Vec<StoreName> {
        read_or_recover(&self.stores, "registry stores").names()
    }

    // Plugins

    pub fn register_plugin(&self, plugin: Arc<dyn ActivePlugin>) {
        let id = plugin.instance_id();
        log::debug!(
            "Tracking plugin '{}' {} on registry '{}'",
            plugin.plugin_name(),
            id,
            self.label
        );
        lock_or_recover(&self.plugins, "registry plugins").insert(id, plugin);
    }

    pub fn deregister_plugin(&self, id: PluginInstanceId) -> Option<Arc<dyn ActivePlugin>> {
        lock_or_recover(&self.plugins, "registry plugins").remove(&id)
    }

    pub fn get_plugin(&self, id: PluginInstanceId) -> Option<Arc<dyn ActivePlugin>> {
        lock_or_recover(&self.plugins, "registry plugins").get(&id).cloned()
    }

    /// Ids of plugins still active on this registry, in activation order
    pub fn plugin_ids(&self) -> Vec<PluginInstanceId> {
        lock_or_recover(&self.plugins, "registry plugins")
            .keys()
            .copied()
            .collect()
    }

    // Lifecycle

    /// Deactivate every active plugin, then drop every listener and registration
    ///
    /// Idempotent. On the global registry this is a guarded no-op: the global
    /// registry lives for the whole process and is only cleared through
    /// [`AppRegistry::force_deactivate`].
    pub fn deactivate(&self) {
        if self.is_global() {
            log::warn!(
                "Ignoring deactivate() on global app registry '{}'; use force_deactivate() to clear it",
                self.label
            );
            return;
        }
        self.teardown();
    }

    /// Deactivate regardless of kind; the explicit way to clear a global registry
    pub fn force_deactivate(&self) {
        self.teardown();
    }

    fn teardown(&self) {
        // Plugins are taken out first so their own deactivation (which
        // deregisters them from this registry) never contends on the map
        let plugins = std::mem::take(&mut *lock_or_recover(&self.plugins, "registry plugins"));
        log::debug!(
            "Deactivating app registry '{}' ({} active plugin(s))",
            self.label,
            plugins.len()
        );
        for plugin in plugins.into_values() {
            plugin.deactivate();
        }

        self.bus.remove_all_listeners(None);
        write_or_recover(&self.components, "registry components").clear();
        write_or_recover(&self.roles, "registry roles").clear();
        write_or_recover(&self.stores, "registry stores").clear();
    }
}

impl EventTarget for AppRegistry {
    fn add_listener(&self, event: &str, handler: Handler) -> Disposer {
        self.bus.add_listener(event, handler)
    }
}
