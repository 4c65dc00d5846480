//! Event log plugin
//!
//! Logs every configured event seen on its target registry and keeps the
//! most recent ones in an observable store.

use crate::actions::api::ObservableStore;
use crate::builtin_plugin;
use crate::plugin::catalog::BuiltinPlugin;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::helpers::ActivateHelpers;
use crate::plugin::traits::Plugin;
use crate::plugin::types::{Activation, BuiltinServices, PluginInfo, PluginSettings};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const PLUGIN_NAME: &str = "event-log";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedEvent {
    pub event: String,
    pub args: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventLog {
    pub entries: Vec<LoggedEvent>,
}

pub struct EventLogPlugin;

impl EventLogPlugin {
    fn plugin_info() -> PluginInfo {
        PluginInfo::current(PLUGIN_NAME, "Log configured events and keep them in a store")
    }

    fn factory() -> Box<BuiltinPlugin> {
        Box::new(EventLogPlugin)
    }
}

builtin_plugin!(EventLogPlugin::plugin_info, EventLogPlugin::factory);

impl Plugin for EventLogPlugin {
    type Initial = PluginSettings;
    type Services = BuiltinServices;

    fn info(&self) -> PluginInfo {
        Self::plugin_info()
    }

    fn activate(
        &self,
        settings: PluginSettings,
        services: BuiltinServices,
        helpers: &ActivateHelpers,
    ) -> PluginResult<Activation> {
        if settings.events.is_empty() {
            return Err(PluginError::generic(format!(
                "'{}' needs at least one event to log",
                settings.name
            )));
        }

        let store = ObservableStore::new(PLUGIN_NAME, EventLog::default());
        let target = Arc::clone(services.registry_for(settings.scope));

        for event in &settings.events {
            let store = store.clone();
            let signal = helpers.signal();
            let scope = helpers.clone();
            let event_name = event.clone();
            let limit = settings.limit;
            helpers.on(target.as_ref(), event, move |args| {
                if signal.is_aborted() {
                    return Ok(());
                }
                // A limit counts recorded events, so a limit of 0 records none
                if limit.is_some_and(|limit| store.state().entries.len() >= limit) {
                    scope.deactivate();
                    return Ok(());
                }
                log::info!("{} {}", event_name, Value::Array(args.to_vec()));
                store.update(|state| {
                    state.entries.push(LoggedEvent {
                        event: event_name.clone(),
                        args: args.to_vec(),
                    })
                });
                if limit.is_some_and(|limit| store.state().entries.len() >= limit) {
                    log::debug!("'{}' reached its limit of {:?} events", PLUGIN_NAME, limit);
                    scope.deactivate();
                }
                Ok(())
            });
        }

        let local = Arc::downgrade(&services.local);
        services.local.register_store(PLUGIN_NAME, store.handle());
        helpers.cleanup(move || {
            if let Some(local) = local.upgrade() {
                local.deregister_store(PLUGIN_NAME);
            }
        });

        log::debug!(
            "'{}' logging {} event(s) on the {} registry",
            PLUGIN_NAME,
            settings.events.len(),
            settings.scope
        );
        Ok(Activation::new(store.handle()))
    }
}
