//! Observable plugin stores
//!
//! State lives behind a lock; every change notifies listeners with the new
//! state serialised to JSON, so listeners never need the concrete type.

use crate::core::cleanup::Disposer;
use crate::core::error_channel::{report, ErrorOrigin};
use crate::core::sync::{read_or_recover, write_or_recover};
use crate::events::bus::{EventBus, HandlerResult};
use crate::registry::api::StoreHandle;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, RwLock};

const CHANGE_EVENT: &str = "change";

struct StoreInner<S> {
    name: String,
    state: RwLock<S>,
    bus: EventBus,
}

/// Shared, observable state; clones share the same state and listeners
pub struct ObservableStore<S> {
    inner: Arc<StoreInner<S>>,
}

impl<S> Clone for ObservableStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for ObservableStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableStore")
            .field("name", &self.inner.name)
            .field("state", &*read_or_recover(&self.inner.state, "store state"))
            .finish()
    }
}

impl<S> ObservableStore<S>
where
    S: Serialize + Clone + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, initial: S) -> Self {
        let name = name.into();
        Self {
            inner: Arc::new(StoreInner {
                bus: EventBus::new(format!("store:{}", name)),
                name,
                state: RwLock::new(initial),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// A copy of the current state
    pub fn state(&self) -> S {
        read_or_recover(&self.inner.state, "store state").clone()
    }

    /// Replace the state and notify listeners
    pub fn set_state(&self, state: S) {
        *write_or_recover(&self.inner.state, "store state") = state;
        self.notify();
    }

    /// Mutate a copy of the state, store it and notify listeners
    ///
    /// `mutate` runs without the state lock held, so it may read the store.
    /// Concurrent updates are last-writer-wins.
    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut S),
    {
        let mut next = self.state();
        mutate(&mut next);
        *write_or_recover(&self.inner.state, "store state") = next;
        self.notify();
    }

    /// Listen for changes; the handler receives the new state as its only argument
    pub fn listen<F>(&self, handler: F) -> Disposer
    where
        F: Fn(&[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        self.inner.bus.on(CHANGE_EVENT, handler)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.bus.listener_count(CHANGE_EVENT)
    }

    /// Type-erased handle for registries and activations
    pub fn handle(&self) -> StoreHandle {
        StoreHandle::new(self.clone())
    }

    fn notify(&self) {
        if !self.inner.bus.has_listeners(CHANGE_EVENT) {
            return;
        }
        // Serialise outside the write lock so listeners can read the store
        let snapshot = self.state();
        match serde_json::to_value(&snapshot) {
            Ok(value) => {
                self.inner.bus.emit(CHANGE_EVENT, &[value]);
            }
            Err(error) => report(
                ErrorOrigin::Store,
                format!("store:{}", self.inner.name),
                format!("Failed to serialise state: {}", error),
            ),
        }
    }
}
