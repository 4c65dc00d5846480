//! Event bus scenarios

use crate::common::CallLog;
use app_registry::events::api::{EventBus, Handler, HandlerResult};
use app_registry::registry::api::AppRegistry;
use serde_json::{json, Value};
use std::sync::Arc;

#[test]
fn test_listeners_fire_once_in_registration_order() {
    let registry = AppRegistry::new_local();
    let calls = CallLog::new();

    let first = calls.clone();
    let _h1 = registry.on("refresh", move |_| {
        first.push("h1");
        Ok(())
    });
    let second = calls.clone();
    let _h2 = registry.on("refresh", move |_| {
        second.push("h2");
        Ok(())
    });

    assert_eq!(registry.emit("refresh", &[]), 2);
    assert_eq!(calls.entries(), vec!["h1", "h2"]);
}

#[test]
fn test_disposer_removes_only_its_own_registration() {
    let bus = EventBus::new("shared");
    let calls = CallLog::new();

    // The same handler registered twice is two registrations
    let recorder = calls.clone();
    let handler: Handler = Arc::new(move |_: &[Value]| -> HandlerResult {
        recorder.push("hit");
        Ok(())
    });
    let first = {
        let handler = handler.clone();
        bus.on("x", move |args| handler(args))
    };
    let _second = {
        let handler = handler.clone();
        bus.on("x", move |args| handler(args))
    };

    assert!(first.dispose());
    assert!(!first.dispose());
    bus.emit("x", &[]);
    assert_eq!(calls.count("hit"), 1);
    assert_eq!(bus.listener_count("x"), 1);
}

#[test]
fn test_remove_all_listeners_silences_every_event() {
    let registry = AppRegistry::new_local();
    let calls = CallLog::new();

    for event in ["a", "b", "c"] {
        let recorder = calls.clone();
        let _ = registry.on(event, move |_| {
            recorder.push("called");
            Ok(())
        });
    }
    registry.remove_all_listeners(None);

    for event in ["a", "b", "c", "never-registered"] {
        assert_eq!(registry.emit(event, &[json!(1)]), 0);
    }
    assert!(calls.entries().is_empty());
}

#[test]
fn test_failing_listener_does_not_stop_the_others() {
    let registry = AppRegistry::new_local();
    let calls = CallLog::new();

    let _failing = registry.on("save", |_| Err("disk full".into()));
    let _panicking = registry.on("save", |_| panic!("listener bug"));
    let recorder = calls.clone();
    let _working = registry.on("save", move |args| {
        recorder.push(format!("saved {}", args[0]));
        Ok(())
    });

    assert_eq!(registry.emit("save", &[json!("doc")]), 3);
    assert_eq!(calls.entries(), vec!["saved \"doc\""]);
}

#[test]
fn test_once_listener_fires_a_single_time() {
    let registry = AppRegistry::new_local();
    let calls = CallLog::new();

    let recorder = calls.clone();
    let _ = registry.once("ready", move |_| {
        recorder.push("ready");
        Ok(())
    });

    registry.emit("ready", &[]);
    registry.emit("ready", &[]);
    assert_eq!(calls.count("ready"), 1);
    assert_eq!(registry.listener_count("ready"), 0);
}
