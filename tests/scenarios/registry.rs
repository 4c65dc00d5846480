//! Component, role and global registry scenarios

use app_registry::registry::api::{
    global_app_registry, AppRegistry, ComponentHandle, RegistryKind, RoleEntry,
};
use serial_test::serial;
use std::sync::Arc;

#[derive(Debug, PartialEq)]
struct Widget(&'static str);

#[test]
fn test_component_registered_twice_is_overwritten() {
    let registry = AppRegistry::new_local();

    assert!(registry
        .register_component("Foo", ComponentHandle::new(Widget("first")))
        .is_none());
    let replaced = registry.register_component("Foo", ComponentHandle::new(Widget("second")));

    assert_eq!(replaced.unwrap().downcast_ref::<Widget>(), Some(&Widget("first")));
    let current = registry.get_component("Foo").unwrap();
    assert_eq!(current.downcast_ref::<Widget>(), Some(&Widget("second")));
    assert_eq!(registry.component_names().len(), 1);
}

#[test]
fn test_role_absent_until_registered_then_empty_after_removal() {
    let registry = AppRegistry::new_local();
    assert!(registry.get_role("Action").is_none());

    let entry = RoleEntry::new("Export", ComponentHandle::new(Widget("export")));
    registry.register_role("Action", entry.clone());
    assert_eq!(registry.get_role("Action").map(|entries| entries.len()), Some(1));

    assert_eq!(registry.deregister_role("Action", &entry.name), 1);
    assert!(registry.get_role("Action").is_some_and(|entries| entries.is_empty()));
}

#[test]
fn test_role_keeps_contribution_order() {
    let registry = AppRegistry::new_local();
    for name in ["Import", "Export", "Copy"] {
        registry.register_role(
            "Action",
            RoleEntry::new(name, ComponentHandle::new(Widget(name))),
        );
    }

    let names: Vec<String> = registry
        .get_role("Action")
        .unwrap()
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(names, vec!["Import", "Export", "Copy"]);
}

#[test]
fn test_deactivate_twice_matches_deactivate_once() {
    let once = AppRegistry::new_local();
    let twice = AppRegistry::new_local();
    for registry in [&once, &twice] {
        let _ = registry.on("x", |_| Ok(()));
        registry.register_component("Foo", ComponentHandle::new(Widget("foo")));
        registry.register_role("Action", RoleEntry::new("Export", ComponentHandle::new(())));
    }

    once.deactivate();
    twice.deactivate();
    twice.deactivate();

    for registry in [&once, &twice] {
        assert_eq!(registry.listener_count("x"), 0);
        assert!(registry.component_names().is_empty());
        assert!(registry.role_names().is_empty());
        assert!(registry.plugin_ids().is_empty());
    }
}

#[test]
#[serial]
fn test_global_registry_is_shared_and_survives_deactivate() {
    let global = global_app_registry();
    assert_eq!(global.kind(), RegistryKind::Global);
    assert!(Arc::ptr_eq(&global, &global_app_registry()));

    let disposer = global.on("scenario:global", |_| Ok(()));
    global.deactivate();
    assert_eq!(global_app_registry().listener_count("scenario:global"), 1);

    disposer.dispose();
    assert_eq!(global.listener_count("scenario:global"), 0);
}

#[test]
fn test_injected_global_is_isolated_from_the_shared_one() {
    let injected = AppRegistry::new_global();
    let _ = injected.on("scenario:injected", |_| Ok(()));
    assert_eq!(injected.listener_count("scenario:injected"), 1);
    assert_eq!(global_app_registry().listener_count("scenario:injected"), 0);
}
