//! Plugin Test Utilities
//!
//! A scriptable plugin and an event target that records unsubscriptions.

use crate::core::cleanup::Disposer;
use crate::events::bus::{EventTarget, Handler};
use crate::plugin::error::PluginResult;
use crate::plugin::helpers::ActivateHelpers;
use crate::plugin::traits::Plugin;
use crate::plugin::types::{Activation, PluginInfo};
use crate::registry::api::AppRegistry;
use std::sync::{Arc, Mutex};

type ActivateFn = dyn Fn(&ActivateHelpers, &Arc<AppRegistry>) -> PluginResult<Activation> + Send + Sync;

/// Plugin whose activation is supplied by the test
pub struct MockPlugin {
    pub name: String,
    activate: Box<ActivateFn>,
}

impl MockPlugin {
    pub fn new<F>(name: &str, activate: F) -> Self
    where
        F: Fn(&ActivateHelpers, &Arc<AppRegistry>) -> PluginResult<Activation> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            activate: Box::new(activate),
        }
    }
}

impl Plugin for MockPlugin {
    type Initial = ();
    type Services = Arc<AppRegistry>;

    fn info(&self) -> PluginInfo {
        PluginInfo::current(self.name.clone(), "Mock plugin for testing")
    }

    fn activate(
        &self,
        _initial: (),
        services: Arc<AppRegistry>,
        helpers: &ActivateHelpers,
    ) -> PluginResult<Activation> {
        (self.activate)(helpers, &services)
    }
}

/// Shared ordered log of teardown steps
pub type StepLog = Arc<Mutex<Vec<String>>>;

pub fn step_log() -> StepLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn push(log: &StepLog, step: impl Into<String>) {
    log.lock().unwrap().push(step.into());
}

pub fn steps(log: &StepLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Event target whose disposers record `unsubscribe:<event>`
pub struct RecordingTarget {
    pub log: StepLog,
}

impl EventTarget for RecordingTarget {
    fn add_listener(&self, event: &str, _handler: Handler) -> Disposer {
        let log = self.log.clone();
        let step = format!("unsubscribe:{}", event);
        Disposer::new(format!("listener:{}", event), move || push(&log, step))
    }
}
