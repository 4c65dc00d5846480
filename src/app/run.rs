//! The `run` command
//!
//! Mounts a provider scope with its own local registry under the given
//! global registry, activates the configured builtin plugins in it, emits
//! the requested events on both registries, unmounts the scope and reports
//! what happened.

use crate::actions::api::ObservableStore;
use crate::app::cli::args::RunArgs;
use crate::app::cli::config::AppConfig;
use crate::app::cli::emit::EmitSpec;
use crate::app::error::AppError;
use crate::context::api::{LocalRegistry, ProviderScope};
use crate::core::error_channel;
use crate::plugin::api::builtins::{CounterStore, EventLog};
use crate::plugin::api::{find_builtin, BuiltinServices, PluginLifecycleScope, PluginSettings, RegistryTarget};
use crate::registry::api::{AppRegistry, StoreHandle};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedEvent {
    pub event: String,
    pub global_listeners: usize,
    pub local_listeners: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginReport {
    pub name: String,
    pub scope: RegistryTarget,
    pub state: String,
    pub store: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub emitted: Vec<EmittedEvent>,
    pub plugins: Vec<PluginReport>,
    pub errors: Vec<String>,
}

/// Plugins from the config file plus those named on the command line
///
/// Command line plugins listen to every event that is going to be emitted.
fn collect_settings(config: &AppConfig, run: &RunArgs, emits: &[EmitSpec]) -> Vec<PluginSettings> {
    let mut events: Vec<String> = Vec::new();
    for spec in emits {
        if !events.contains(&spec.event) {
            events.push(spec.event.clone());
        }
    }

    let mut settings = config.plugins.clone();
    settings.extend(
        run.plugins
            .iter()
            .map(|name| PluginSettings::new(name.as_str()).with_events(events.iter().cloned())),
    );
    settings
}

/// JSON view of the stores the builtin plugins return
fn store_snapshot(store: &StoreHandle) -> Option<Value> {
    if let Some(counter) = store.downcast_ref::<CounterStore>() {
        return serde_json::to_value(counter.counts.state()).ok();
    }
    if let Some(log) = store.downcast_ref::<ObservableStore<EventLog>>() {
        return serde_json::to_value(log.state()).ok();
    }
    None
}

pub fn run_plugins(global: Arc<AppRegistry>, config: &AppConfig, run: &RunArgs) -> Result<RunReport, AppError> {
    let emits = run
        .emit
        .iter()
        .map(|spec| spec.parse::<EmitSpec>())
        .collect::<Result<Vec<_>, _>>()?;
    let settings = collect_settings(config, run, &emits);

    let mut errors = error_channel::subscribe();
    let root = ProviderScope::root(global);
    let scope = root.child(LocalRegistry::Create);
    let local = scope.local_registry()?;
    let services = BuiltinServices::new(root.global_registry(), Arc::clone(&local));

    let mut active: Vec<(PluginSettings, Arc<PluginLifecycleScope>)> = Vec::new();
    for plugin_settings in settings {
        let plugin = find_builtin(&plugin_settings.name)?;
        let lifecycle = scope.activate_plugin(plugin.as_ref(), plugin_settings.clone(), services.clone())?;
        log::info!(
            "Activated '{}' {} listening for {:?}",
            plugin_settings.name,
            lifecycle.id(),
            plugin_settings.events
        );
        active.push((plugin_settings, lifecycle));
    }

    let mut report = RunReport::default();
    for spec in &emits {
        let global_listeners = services.global.emit(&spec.event, &spec.args);
        let local_listeners = local.emit(&spec.event, &spec.args);
        report.emitted.push(EmittedEvent {
            event: spec.event.clone(),
            global_listeners,
            local_listeners,
        });
    }

    scope.unmount();

    for (plugin_settings, lifecycle) in active {
        report.plugins.push(PluginReport {
            name: plugin_settings.name,
            scope: plugin_settings.scope,
            state: lifecycle.state().to_string(),
            store: lifecycle.store().as_ref().and_then(store_snapshot),
        });
    }
    while let Ok(reported) = errors.try_recv() {
        report.errors.push(format!(
            "{} {} '{}': {}",
            reported.timestamp.format("%H:%M:%S%.3f"),
            reported.origin,
            reported.context,
            reported.message
        ));
    }

    Ok(report)
}
