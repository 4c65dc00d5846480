//! Provider scope scenarios

use crate::common::CallLog;
use app_registry::context::api::{ContextError, LocalRegistry, Ownership, ProviderScope};
use app_registry::plugin::api::builtins::{CounterStore, EVENT_COUNTER};
use app_registry::plugin::api::{find_builtin, BuiltinServices, LifecycleState, PluginSettings, RegistryTarget};
use app_registry::registry::api::{AppRegistry, ComponentHandle};
use serde_json::json;
use std::sync::Arc;

fn listen(registry: &AppRegistry, calls: &CallLog) {
    let calls = calls.clone();
    let _ = registry.on("x", move |_| {
        calls.push("x");
        Ok(())
    });
}

#[test]
fn test_borrowed_registry_outlives_the_scope() {
    let root = ProviderScope::root(Arc::new(AppRegistry::new_global()));
    let shared = Arc::new(AppRegistry::new_local());
    let calls = CallLog::new();

    let scope = root.child(LocalRegistry::Borrow(shared.clone()));
    assert_eq!(scope.ownership(), Ownership::OwnedByCreator);
    listen(&scope.local_registry().unwrap(), &calls);

    scope.unmount();
    assert!(!scope.is_mounted());
    assert!(matches!(scope.local_registry(), Err(ContextError::NoLocalRegistry)));

    assert_eq!(shared.emit("x", &[]), 1);
    assert_eq!(calls.count("x"), 1);
}

#[test]
fn test_created_and_adopted_registries_are_deactivated_on_unmount() {
    let root = ProviderScope::root(Arc::new(AppRegistry::new_global()));
    let calls = CallLog::new();

    let created = root.child(LocalRegistry::Create);
    let created_registry = created.local_registry().unwrap();
    listen(&created_registry, &calls);

    let adopted_registry = Arc::new(AppRegistry::new_local());
    let adopted = root.child(LocalRegistry::Adopt(adopted_registry.clone()));
    listen(&adopted_registry, &calls);

    assert_eq!(created.ownership(), Ownership::OwnedByScope);
    assert_eq!(adopted.ownership(), Ownership::OwnedByScope);

    drop(created);
    adopted.unmount();
    adopted.unmount();

    assert_eq!(created_registry.emit("x", &[]), 0);
    assert_eq!(adopted_registry.emit("x", &[]), 0);
    assert!(calls.entries().is_empty());
}

#[test]
fn test_unmounting_a_root_leaves_the_global_registry_alone() {
    let global = Arc::new(AppRegistry::new_global());
    let calls = CallLog::new();
    listen(&global, &calls);

    let root = ProviderScope::root(global.clone());
    root.unmount();

    assert_eq!(global.emit("x", &[]), 1);
}

#[test]
fn test_nested_scopes_resolve_components_from_the_global_registry() {
    let global = Arc::new(AppRegistry::new_global());
    global.register_component("Toolbar", ComponentHandle::new("toolbar"));

    let root = ProviderScope::root(global);
    let nested = root.child(LocalRegistry::Create).child(LocalRegistry::Create);

    let toolbar = nested.component("Toolbar").unwrap();
    assert_eq!(toolbar.downcast_ref::<&str>(), Some(&"toolbar"));
    assert!(nested.component("Sidebar").is_none());
    assert!(nested.role("Action").is_none());
}

#[test]
fn test_builtin_plugin_in_a_scope_is_torn_down_on_unmount() {
    let global = Arc::new(AppRegistry::new_global());
    let root = ProviderScope::root(global.clone());
    let scope = root.child(LocalRegistry::Create);
    let local = scope.local_registry().unwrap();

    let plugin = find_builtin(EVENT_COUNTER).unwrap();
    let lifecycle = scope
        .activate_plugin(
            plugin.as_ref(),
            PluginSettings::new(EVENT_COUNTER).with_events(["open"]).with_scope(RegistryTarget::Global),
            BuiltinServices::new(global.clone(), local.clone()),
        )
        .unwrap();

    global.emit("open", &[json!("db")]);
    global.emit("open", &[]);
    let counter = local
        .get_store(EVENT_COUNTER)
        .and_then(|store| store.downcast::<CounterStore>())
        .unwrap();
    assert_eq!(counter.counts.state().count("open"), 2);

    scope.unmount();
    assert_eq!(lifecycle.state(), LifecycleState::Deactivated);
    assert_eq!(global.listener_count("open"), 0);
    assert!(local.get_store(EVENT_COUNTER).is_none());
}
