//! EventBus implementation

use crate::core::cleanup::Disposer;
use crate::core::error_channel::{panic_message, report_error, ErrorOrigin};
use crate::core::sync::{read_or_recover, write_or_recover};
use crate::events::error::EventError;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

/// Error returned by a failing listener
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a single listener invocation
pub type HandlerResult = Result<(), HandlerError>;

/// Shared listener function; receives the emitted arguments
pub type Handler = Arc<dyn Fn(&[Value]) -> HandlerResult + Send + Sync + 'static>;

/// Anything plugins can listen on: a bare bus or an `AppRegistry`
pub trait EventTarget {
    /// Register `handler` for `event`; the disposer removes exactly this registration
    fn add_listener(&self, event: &str, handler: Handler) -> Disposer;
}

#[derive(Clone)]
struct Registration {
    id: u64,
    once: bool,
    handler: Handler,
}

struct BusInner {
    label: String,
    next_id: AtomicU64,
    listeners: RwLock<HashMap<String, Vec<Registration>>>,
}

impl BusInner {
    fn remove(&self, event: &str, id: u64) -> bool {
        let mut listeners = write_or_recover(&self.listeners, "event bus listeners");
        let Some(registrations) = listeners.get_mut(event) else {
            return false;
        };
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            listeners.remove(event);
        }
        removed
    }
}

/// Named publish/subscribe channel
///
/// Cloning an `EventBus` yields another handle to the same listeners.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("label", &self.inner.label)
            .field("events", &self.event_names())
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new("bus")
    }
}

impl EventBus {
    /// Create an empty bus; `label` only appears in logs and error reports
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(BusInner {
                label: label.into(),
                next_id: AtomicU64::new(1),
                listeners: RwLock::new(HashMap::new()),
            }),
        }
    }

    pub fn label(&self) -> &str {
        &self.inner.label
    }

    /// Register a listener for `event`
    pub fn on<F>(&self, event: &str, handler: F) -> Disposer
    where
        F: Fn(&[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(event, Arc::new(handler), false)
    }

    /// Register a listener that is removed before its first invocation
    pub fn once<F>(&self, event: &str, handler: F) -> Disposer
    where
        F: Fn(&[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        self.register(event, Arc::new(handler), true)
    }

    fn register(&self, event: &str, handler: Handler, once: bool) -> Disposer {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        write_or_recover(&self.inner.listeners, "event bus listeners")
            .entry(event.to_string())
            .or_default()
            .push(Registration { id, once, handler });
        log::trace!(
            "Registered listener #{} for '{}' on {}",
            id,
            event,
            self.inner.label
        );

        // The disposer must not keep the bus alive
        let weak: Weak<BusInner> = Arc::downgrade(&self.inner);
        let event_name = event.to_string();
        Disposer::new(format!("listener:{}", event), move || {
            if let Some(inner) = weak.upgrade() {
                if inner.remove(&event_name, id) {
                    log::trace!(
                        "Removed listener #{} for '{}' on {}",
                        id,
                        event_name,
                        inner.label
                    );
                }
            }
        })
    }

    /// Invoke every listener registered for `event` at the time of the call
    ///
    /// Listeners run synchronously in registration order. A listener that
    /// fails or panics is reported to the error channel and the remaining
    /// listeners still run. Listeners added while this emission is running do
    /// not fire in it. Returns the number of listeners invoked.
    pub fn emit(&self, event: &str, args: &[Value]) -> usize {
        let snapshot: Vec<Registration> = {
            let mut listeners = write_or_recover(&self.inner.listeners, "event bus listeners");
            let Some(registrations) = listeners.get_mut(event) else {
                log::trace!("Emitting '{}' on {}: no listeners", event, self.inner.label);
                return 0;
            };
            let snapshot = registrations.clone();
            registrations.retain(|registration| !registration.once);
            if registrations.is_empty() {
                listeners.remove(event);
            }
            snapshot
        };

        log::trace!(
            "Emitting '{}' on {} to {} listener(s)",
            event,
            self.inner.label,
            snapshot.len()
        );

        for registration in &snapshot {
            let outcome = catch_unwind(AssertUnwindSafe(|| (registration.handler)(args)));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(source)) => Some(EventError::ListenerFailed {
                    event: event.to_string(),
                    source,
                }),
                Err(payload) => Some(EventError::ListenerPanicked {
                    event: event.to_string(),
                    message: panic_message(payload.as_ref()),
                }),
            };
            if let Some(error) = failure {
                report_error(ErrorOrigin::Listener, format!("listener:{}", event), &error);
            }
        }

        snapshot.len()
    }

    /// Remove every listener, or only those of one event
    pub fn remove_all_listeners(&self, event: Option<&str>) {
        let mut listeners = write_or_recover(&self.inner.listeners, "event bus listeners");
        match event {
            Some(event) => {
                listeners.remove(event);
            }
            None => listeners.clear(),
        }
        log::trace!(
            "Removed all listeners ({}) on {}",
            event.unwrap_or("every event"),
            self.inner.label
        );
    }

    pub fn listener_count(&self, event: &str) -> usize {
        read_or_recover(&self.inner.listeners, "event bus listeners")
            .get(event)
            .map_or(0, Vec::len)
    }

    pub fn has_listeners(&self, event: &str) -> bool {
        self.listener_count(event) > 0
    }

    /// Events that currently have at least one listener, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = read_or_recover(&self.inner.listeners, "event bus listeners")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl EventTarget for EventBus {
    fn add_listener(&self, event: &str, handler: Handler) -> Disposer {
        self.register(event, handler, false)
    }
}
