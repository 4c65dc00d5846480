//! Plugin lifecycle scopes
//!
//! One [`PluginLifecycleScope`] exists per plugin activation. It tracks every
//! listener and cleanup the plugin registers through its activation helpers
//! and undoes them, in registration order, when the scope is deactivated
//! (explicitly, by the plugin itself, or because the registry it was
//! activated against is deactivated).

use crate::core::cleanup::{Disposer, DisposerSet};
use crate::core::error_channel::{panic_message, report_panic, ErrorOrigin};
use crate::core::sync::lock_or_recover;
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::helpers::ActivateHelpers;
use crate::plugin::signal::{AbortController, AbortSignal};
use crate::plugin::traits::Plugin;
use crate::plugin::types::DeactivateHook;
use crate::registry::api::{ActivePlugin, AppRegistry, PluginInstanceId, StoreHandle};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, Weak};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LifecycleState {
    Inactive,
    Activating,
    Active,
    Deactivating,
    Deactivated,
}

impl LifecycleState {
    /// States in which new registrations are tracked rather than disposed
    fn accepts_registrations(self) -> bool {
        matches!(self, LifecycleState::Activating | LifecycleState::Active)
    }
}

struct ScopeState {
    lifecycle: LifecycleState,
    listeners: DisposerSet,
    cleanups: DisposerSet,
    plugin_deactivate: Option<DeactivateHook>,
    store: Option<StoreHandle>,
    deactivate_requested: bool,
}

/// Everything that has to run, in order, to tear a scope down
struct Teardown {
    listeners: DisposerSet,
    cleanups: DisposerSet,
    plugin_deactivate: Option<DeactivateHook>,
}

pub struct PluginLifecycleScope {
    id: PluginInstanceId,
    plugin_name: String,
    state: Mutex<ScopeState>,
    controller: AbortController,
    registry: Mutex<Option<Weak<AppRegistry>>>,
}

impl fmt::Debug for PluginLifecycleScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginLifecycleScope")
            .field("id", &self.id)
            .field("plugin_name", &self.plugin_name)
            .field("state", &self.state())
            .finish()
    }
}

impl PluginLifecycleScope {
    pub fn new(plugin_name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: PluginInstanceId::next(),
            plugin_name: plugin_name.into(),
            state: Mutex::new(ScopeState {
                lifecycle: LifecycleState::Inactive,
                listeners: DisposerSet::new(),
                cleanups: DisposerSet::new(),
                plugin_deactivate: None,
                store: None,
                deactivate_requested: false,
            }),
            controller: AbortController::new(),
            registry: Mutex::new(None),
        })
    }

    pub fn id(&self) -> PluginInstanceId {
        self.id
    }

    pub fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    pub fn state(&self) -> LifecycleState {
        self.lock_state().lifecycle
    }

    pub fn is_active(&self) -> bool {
        self.state() == LifecycleState::Active
    }

    /// Store returned by the plugin; still readable after deactivation
    pub fn store(&self) -> Option<StoreHandle> {
        self.lock_state().store.clone()
    }

    pub fn signal(&self) -> AbortSignal {
        self.controller.signal()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ScopeState> {
        lock_or_recover(&self.state, "plugin lifecycle state")
    }

    /// Activate `plugin` against `registry`
    ///
    /// Only an `Inactive` scope can be activated. On success the scope is
    /// `Active`, tracked by `registry`, and the plugin's store is returned.
    /// If the plugin fails (error or panic) everything it registered so far
    /// is disposed, the signal is aborted, the scope ends `Deactivated` and
    /// `PluginError::ActivationFailed` is returned.
    pub fn activate<P>(
        self: &Arc<Self>,
        plugin: &P,
        registry: &Arc<AppRegistry>,
        initial: P::Initial,
        services: P::Services,
    ) -> PluginResult<StoreHandle>
    where
        P: Plugin + ?Sized,
    {
        {
            let mut state = self.lock_state();
            if state.lifecycle != LifecycleState::Inactive {
                return Err(PluginError::InvalidState {
                    plugin_name: self.plugin_name.clone(),
                    state: state.lifecycle.to_string(),
                    operation: "activate".to_string(),
                });
            }
            state.lifecycle = LifecycleState::Activating;
        }

        log::debug!(
            "Activating plugin '{}' {} on registry '{}'",
            self.plugin_name,
            self.id,
            registry.label()
        );
        let helpers = ActivateHelpers::new(self);
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            plugin.activate(initial, services, &helpers)
        }));

        let activation = match outcome {
            Ok(Ok(activation)) => activation,
            Ok(Err(error)) => {
                let error = match error {
                    PluginError::ActivationFailed { .. } => error,
                    other => PluginError::activation_failed_from(&self.plugin_name, other),
                };
                return Err(self.fail_activation(error));
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                return Err(self.fail_activation(PluginError::activation_failed(
                    &self.plugin_name,
                    format!("panicked: {}", message),
                )));
            }
        };

        let store = activation.store.clone();
        let deactivate_requested = {
            let mut state = self.lock_state();
            state.lifecycle = LifecycleState::Active;
            state.store = Some(activation.store);
            state.plugin_deactivate = activation.deactivate;
            *lock_or_recover(&self.registry, "plugin registry link") = Some(Arc::downgrade(registry));
            registry.register_plugin(self.clone());
            state.deactivate_requested
        };
        log::debug!("Plugin '{}' {} is active", self.plugin_name, self.id);

        if deactivate_requested {
            log::debug!(
                "Plugin '{}' {} requested deactivation while activating",
                self.plugin_name,
                self.id
            );
            self.deactivate();
        }
        Ok(store)
    }

    fn fail_activation(&self, error: PluginError) -> PluginError {
        log::warn!("{}", error);
        // A failed activation never passes through Deactivating
        let teardown = {
            let mut state = self.lock_state();
            state.lifecycle = LifecycleState::Deactivated;
            Teardown {
                listeners: state.listeners.take(),
                cleanups: state.cleanups.take(),
                plugin_deactivate: None,
            }
        };
        self.run_teardown(teardown, "activation failed");
        error
    }

    /// Tear the scope down; only the first call on an active scope has effect
    ///
    /// Runs listener disposers, then cleanups, then the plugin's own
    /// deactivate hook, then aborts the signal. Called while the plugin is
    /// still activating, the request is deferred until activation returns.
    /// A scope that was never activated goes straight to `Deactivated`.
    pub fn deactivate(&self) {
        let teardown = {
            let mut state = self.lock_state();
            match state.lifecycle {
                LifecycleState::Active => {
                    state.lifecycle = LifecycleState::Deactivating;
                    Teardown {
                        listeners: state.listeners.take(),
                        cleanups: state.cleanups.take(),
                        plugin_deactivate: state.plugin_deactivate.take(),
                    }
                }
                LifecycleState::Activating => {
                    state.deactivate_requested = true;
                    return;
                }
                LifecycleState::Inactive => {
                    state.lifecycle = LifecycleState::Deactivated;
                    drop(state);
                    self.controller.abort("deactivated before activation");
                    return;
                }
                LifecycleState::Deactivating | LifecycleState::Deactivated => return,
            }
        };

        log::debug!("Deactivating plugin '{}' {}", self.plugin_name, self.id);
        self.run_teardown(teardown, "deactivated");

        let registry = lock_or_recover(&self.registry, "plugin registry link").take();
        if let Some(registry) = registry.and_then(|weak| weak.upgrade()) {
            registry.deregister_plugin(self.id);
        }
    }

    fn run_teardown(&self, mut teardown: Teardown, reason: &str) {
        let listeners = teardown.listeners.dispose_all();
        let cleanups = teardown.cleanups.dispose_all();
        log::trace!(
            "Plugin '{}' {} disposed {} listener(s) and {} cleanup(s)",
            self.plugin_name,
            self.id,
            listeners,
            cleanups
        );

        if let Some(hook) = teardown.plugin_deactivate {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(hook)) {
                report_panic(
                    ErrorOrigin::PluginHook,
                    format!("plugin:{}:deactivate", self.plugin_name),
                    payload.as_ref(),
                );
            }
        }

        self.controller.abort(reason);
        self.lock_state().lifecycle = LifecycleState::Deactivated;
    }

    pub(crate) fn track_listener(&self, disposer: Disposer) {
        self.track(disposer, |state| &mut state.listeners);
    }

    pub(crate) fn track_cleanup(&self, disposer: Disposer) {
        self.track(disposer, |state| &mut state.cleanups);
    }

    fn track(&self, disposer: Disposer, set: impl FnOnce(&mut ScopeState) -> &mut DisposerSet) {
        let mut state = self.lock_state();
        if state.lifecycle.accepts_registrations() {
            set(&mut state).push(disposer);
            return;
        }
        let lifecycle = state.lifecycle;
        drop(state);

        log::debug!(
            "Plugin '{}' {} registered '{}' while {}; disposing it immediately",
            self.plugin_name,
            self.id,
            disposer.label(),
            lifecycle
        );
        disposer.dispose();
    }
}

impl ActivePlugin for PluginLifecycleScope {
    fn instance_id(&self) -> PluginInstanceId {
        self.id
    }

    fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    fn deactivate(&self) {
        PluginLifecycleScope::deactivate(self);
    }
}
