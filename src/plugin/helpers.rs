//! Activation helpers handed to `Plugin::activate`

use crate::core::cleanup::Disposer;
use crate::events::bus::{EventTarget, Handler, HandlerResult};
use crate::plugin::lifecycle::PluginLifecycleScope;
use crate::plugin::signal::AbortSignal;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};

/// Registration surface tied to one lifecycle scope
///
/// Cheap to clone; clones can be moved into listeners. Helpers only hold a
/// weak link to their scope, so keeping one around never keeps a
/// deactivated plugin alive.
#[derive(Clone)]
pub struct ActivateHelpers {
    scope: Weak<PluginLifecycleScope>,
    signal: AbortSignal,
}

impl fmt::Debug for ActivateHelpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivateHelpers")
            .field("active", &self.is_active())
            .field("signal", &self.signal)
            .finish()
    }
}

impl ActivateHelpers {
    pub(crate) fn new(scope: &Arc<PluginLifecycleScope>) -> Self {
        Self {
            scope: Arc::downgrade(scope),
            signal: scope.signal(),
        }
    }

    /// Subscribe to `event` on `target` for the lifetime of the scope
    pub fn on<T, F>(&self, target: &T, event: &str, handler: F)
    where
        T: EventTarget + ?Sized,
        F: Fn(&[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let disposer = target.add_listener(event, handler);
        match self.scope.upgrade() {
            Some(scope) => scope.track_listener(disposer),
            None => {
                disposer.dispose();
            }
        }
    }

    /// Run `cleanup` when the scope is deactivated
    pub fn cleanup(&self, cleanup: impl FnOnce() + Send + 'static) {
        let disposer = Disposer::new("cleanup", cleanup);
        match self.scope.upgrade() {
            Some(scope) => scope.track_cleanup(disposer),
            None => {
                disposer.dispose();
            }
        }
    }

    /// The scope's abort signal, shared by all of the plugin's work
    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Ask for the scope to be deactivated
    ///
    /// From inside `activate` the request takes effect once activation
    /// returns successfully.
    pub fn deactivate(&self) {
        if let Some(scope) = self.scope.upgrade() {
            scope.deactivate();
        }
    }

    pub fn is_active(&self) -> bool {
        self.scope.upgrade().is_some_and(|scope| scope.is_active())
    }
}
