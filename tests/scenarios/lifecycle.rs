//! Plugin lifecycle scenarios

use crate::common::CallLog;
use app_registry::plugin::api::{
    Activation, ActivateHelpers, LifecycleState, Plugin, PluginError, PluginInfo,
    PluginLifecycleScope, PluginResult,
};
use app_registry::registry::api::{AppRegistry, StoreHandle};
use std::sync::Arc;

/// Listens on a registry, then either succeeds or fails as told
struct ListenerPlugin {
    calls: CallLog,
    fail_after_listening: bool,
}

impl ListenerPlugin {
    fn new(calls: &CallLog, fail_after_listening: bool) -> Self {
        Self {
            calls: calls.clone(),
            fail_after_listening,
        }
    }
}

impl Plugin for ListenerPlugin {
    type Initial = &'static str;
    type Services = Arc<AppRegistry>;

    fn info(&self) -> PluginInfo {
        PluginInfo::current("listener", "Listens for one event")
    }

    fn activate(
        &self,
        event: &'static str,
        bus: Arc<AppRegistry>,
        helpers: &ActivateHelpers,
    ) -> PluginResult<Activation> {
        let calls = self.calls.clone();
        helpers.on(bus.as_ref(), event, move |_| {
            calls.push("fn");
            Ok(())
        });

        let calls = self.calls.clone();
        helpers.cleanup(move || calls.push("cleanup"));

        let aborted = self.calls.clone();
        let _ = helpers.signal().on_abort(move || aborted.push("abort"));

        if self.fail_after_listening {
            return Err(PluginError::generic("refused to start"));
        }

        let calls = self.calls.clone();
        Ok(Activation::new(StoreHandle::new(event.len())).with_deactivate(move || calls.push("hook")))
    }
}

#[test]
fn test_failed_activation_removes_listener_and_propagates() {
    let calls = CallLog::new();
    let bus = Arc::new(AppRegistry::new_local());
    let local = Arc::new(AppRegistry::new_local());
    let scope = PluginLifecycleScope::new("listener");

    let error = scope
        .activate(&ListenerPlugin::new(&calls, true), &local, "x", bus.clone())
        .unwrap_err();

    assert!(matches!(error, PluginError::ActivationFailed { .. }));
    assert!(error.to_string().contains("refused to start"));
    assert_eq!(bus.listener_count("x"), 0);
    assert_eq!(bus.emit("x", &[]), 0);
    assert_eq!(calls.entries(), vec!["cleanup", "abort"]);
    assert_eq!(scope.state(), LifecycleState::Deactivated);
    assert!(local.plugin_ids().is_empty());
}

#[test]
fn test_deactivate_runs_teardown_in_order_once() {
    let calls = CallLog::new();
    let bus = Arc::new(AppRegistry::new_local());
    let local = Arc::new(AppRegistry::new_local());
    let scope = PluginLifecycleScope::new("listener");

    let store = scope
        .activate(&ListenerPlugin::new(&calls, false), &local, "x", bus.clone())
        .unwrap();
    assert_eq!(store.downcast_ref::<usize>(), Some(&1));
    assert_eq!(local.plugin_ids(), vec![scope.id()]);

    bus.emit("x", &[]);
    scope.deactivate();
    scope.deactivate();

    assert_eq!(calls.entries(), vec!["fn", "cleanup", "hook", "abort"]);
    assert_eq!(bus.emit("x", &[]), 0);
    assert_eq!(scope.state(), LifecycleState::Deactivated);
    assert!(scope.signal().is_aborted());
    assert!(local.plugin_ids().is_empty());
}

#[test]
fn test_local_registry_deactivation_tears_down_its_plugins() {
    let calls = CallLog::new();
    let global = Arc::new(AppRegistry::new_global());
    let local = Arc::new(AppRegistry::new_local());

    let first = PluginLifecycleScope::new("first");
    let second = PluginLifecycleScope::new("second");
    first
        .activate(&ListenerPlugin::new(&calls, false), &local, "a", global.clone())
        .unwrap();
    second
        .activate(&ListenerPlugin::new(&calls, false), &local, "b", global.clone())
        .unwrap();
    assert_eq!(global.listener_count("a") + global.listener_count("b"), 2);

    local.deactivate();
    local.deactivate();

    assert_eq!(first.state(), LifecycleState::Deactivated);
    assert_eq!(second.state(), LifecycleState::Deactivated);
    assert_eq!(global.listener_count("a") + global.listener_count("b"), 0);
    assert_eq!(calls.count("hook"), 2);
}

#[test]
fn test_scope_cannot_be_reused_after_deactivation() {
    let calls = CallLog::new();
    let bus = Arc::new(AppRegistry::new_local());
    let local = Arc::new(AppRegistry::new_local());
    let scope = PluginLifecycleScope::new("listener");

    scope
        .activate(&ListenerPlugin::new(&calls, false), &local, "x", bus.clone())
        .unwrap();
    scope.deactivate();

    let error = scope
        .activate(&ListenerPlugin::new(&calls, false), &local, "x", bus.clone())
        .unwrap_err();
    assert!(matches!(error, PluginError::InvalidState { .. }));
    assert_eq!(bus.listener_count("x"), 0);
}
