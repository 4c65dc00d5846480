//! Event counter plugin
//!
//! Counts configured events on its target registry. The counts are exposed
//! as an observable store and the plugin also listens for a `reset` action.

use crate::actions::api::{create_actions, ActionSet, ObservableStore};
use crate::builtin_plugin;
use crate::plugin::catalog::BuiltinPlugin;
use crate::plugin::error::PluginResult;
use crate::plugin::helpers::ActivateHelpers;
use crate::plugin::traits::Plugin;
use crate::plugin::types::{Activation, BuiltinServices, PluginInfo, PluginSettings};
use crate::registry::api::StoreHandle;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

pub const PLUGIN_NAME: &str = "event-counter";

/// Action that zeroes every counter
pub const RESET_ACTION: &str = "reset";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventCounts {
    pub counts: BTreeMap<String, u64>,
    pub total: u64,
}

impl EventCounts {
    pub fn count(&self, event: &str) -> u64 {
        self.counts.get(event).copied().unwrap_or(0)
    }
}

/// What the counter hands back as its store
#[derive(Debug, Clone)]
pub struct CounterStore {
    pub counts: ObservableStore<EventCounts>,
    pub actions: ActionSet,
}

pub struct EventCounterPlugin;

impl EventCounterPlugin {
    fn plugin_info() -> PluginInfo {
        PluginInfo::current(PLUGIN_NAME, "Count configured events")
    }

    fn factory() -> Box<BuiltinPlugin> {
        Box::new(EventCounterPlugin)
    }
}

builtin_plugin!(EventCounterPlugin::plugin_info, EventCounterPlugin::factory);

impl Plugin for EventCounterPlugin {
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
        let counts = ObservableStore::new(PLUGIN_NAME, EventCounts::default());
        let actions = create_actions([RESET_ACTION]);
        let target = Arc::clone(services.registry_for(settings.scope));

        for event in &settings.events {
            let counts = counts.clone();
            let signal = helpers.signal();
            let event_name = event.clone();
            let limit = settings.limit.map(|limit| limit as u64);
            helpers.on(target.as_ref(), event, move |_| {
                if signal.is_aborted() {
                    return Ok(());
                }
                if limit.is_some_and(|limit| counts.state().total >= limit) {
                    return Ok(());
                }
                counts.update(|state| {
                    *state.counts.entry(event_name.clone()).or_insert(0) += 1;
                    state.total += 1;
                });
                Ok(())
            });
        }

        let reset = counts.clone();
        helpers.on(&actions, RESET_ACTION, move |_| {
            reset.set_state(EventCounts::default());
            Ok(())
        });

        let store = CounterStore { counts, actions };
        let local = Arc::downgrade(&services.local);
        services.local.register_store(PLUGIN_NAME, StoreHandle::new(store.clone()));
        helpers.cleanup(move || {
            if let Some(local) = local.upgrade() {
                local.deregister_store(PLUGIN_NAME);
            }
        });

        let summary = store.counts.clone();
        Ok(Activation::new(StoreHandle::new(store)).with_deactivate(move || {
            let state = summary.state();
            log::debug!(
                "'{}' saw {} event(s) across {} name(s)",
                PLUGIN_NAME,
                state.total,
                state.counts.len()
            );
        }))
    }
}
