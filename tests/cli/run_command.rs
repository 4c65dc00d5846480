//! `run` command tests
//!
//! Each test passes its own global registry so the shared one is untouched.

use app_registry::app::cli::args::RunArgs;
use app_registry::app::cli::config::AppConfig;
use app_registry::app::error::AppError;
use app_registry::app::run::run_plugins;
use app_registry::plugin::api::{PluginSettings, RegistryTarget};
use app_registry::registry::api::AppRegistry;
use serde_json::json;
use std::sync::Arc;

fn run_args(plugins: &[&str], emit: &[&str]) -> RunArgs {
    RunArgs {
        plugins: plugins.iter().map(|plugin| plugin.to_string()).collect(),
        emit: emit.iter().map(|event| event.to_string()).collect(),
        json: true,
    }
}

#[test]
fn test_both_builtins_see_the_same_events() {
    let global = Arc::new(AppRegistry::new_global());
    let report = run_plugins(
        global.clone(),
        &AppConfig::default(),
        &run_args(&["event-log", "event-counter"], &["open=\"db\"", "close"]),
    )
    .unwrap();

    assert_eq!(report.emitted[0].global_listeners, 2);
    assert_eq!(report.emitted[1].global_listeners, 2);
    assert!(report.plugins.iter().all(|plugin| plugin.state == "deactivated"));
    assert_eq!(
        report.plugins[0].store,
        Some(json!({"entries": [
            {"event": "open", "args": ["db"]},
            {"event": "close", "args": []}
        ]}))
    );
    assert_eq!(
        report.plugins[1].store,
        Some(json!({"counts": {"close": 1, "open": 1}, "total": 2}))
    );
    assert_eq!(global.listener_count("open"), 0);
}

#[test]
fn test_limit_stops_the_log() {
    let mut config = AppConfig::default();
    config
        .plugins
        .push(PluginSettings::new("event-log").with_events(["tick"]).with_limit(2));

    let report = run_plugins(
        Arc::new(AppRegistry::new_global()),
        &config,
        &run_args(&[], &["tick=1", "tick=2", "tick=3"]),
    )
    .unwrap();

    // The log deactivates itself once full, so later ticks find no listener
    assert_eq!(report.emitted[2].global_listeners, 0);
    assert_eq!(report.plugins[0].scope, RegistryTarget::Global);
    assert_eq!(
        report.plugins[0].store,
        Some(json!({"entries": [
            {"event": "tick", "args": [1]},
            {"event": "tick", "args": [2]}
        ]}))
    );
}

#[test]
fn test_report_serializes_to_json() {
    let report = run_plugins(
        Arc::new(AppRegistry::new_global()),
        &AppConfig::default(),
        &run_args(&["event-counter"], &["ping"]),
    )
    .unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["emitted"][0]["event"], json!("ping"));
    assert_eq!(value["plugins"][0]["scope"], json!("global"));
}

#[test]
fn test_plugin_without_events_fails_the_run() {
    let mut config = AppConfig::default();
    config.plugins.push(PluginSettings::new("event-log"));

    let error = run_plugins(
        Arc::new(AppRegistry::new_global()),
        &config,
        &run_args(&[], &[]),
    )
    .unwrap_err();
    assert!(matches!(error, AppError::Context(_)));
}
