//! Cooperative cancellation
//!
//! Each lifecycle scope owns one [`AbortController`]; the plugin and all of
//! its asynchronous work share the matching [`AbortSignal`]. The framework
//! only signals. It never waits for plugin work to observe the abort.

use crate::core::cleanup::Disposer;
use crate::core::error_channel::{report_panic, ErrorOrigin};
use crate::core::sync::lock_or_recover;
use crate::plugin::error::{PluginError, PluginResult};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

type AbortCallback = Box<dyn FnOnce() + Send + 'static>;

struct AbortState {
    aborted: AtomicBool,
    reason: Mutex<Option<String>>,
    next_callback: AtomicU64,
    callbacks: Mutex<BTreeMap<u64, AbortCallback>>,
    tx: watch::Sender<bool>,
}

/// Read side of an abort: observed by plugins, fired by the lifecycle scope
#[derive(Clone)]
pub struct AbortSignal {
    state: Arc<AbortState>,
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .field("reason", &self.reason())
            .finish()
    }
}

impl AbortSignal {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            state: Arc::new(AbortState {
                aborted: AtomicBool::new(false),
                reason: Mutex::new(None),
                next_callback: AtomicU64::new(0),
                callbacks: Mutex::new(BTreeMap::new()),
                tx,
            }),
        }
    }

    pub fn is_aborted(&self) -> bool {
        self.state.aborted.load(Ordering::SeqCst)
    }

    pub fn reason(&self) -> Option<String> {
        lock_or_recover(&self.state.reason, "abort reason").clone()
    }

    /// Run `callback` once the signal aborts
    ///
    /// If the signal has already aborted the callback runs immediately and a
    /// no-op disposer is returned. Disposing the returned disposer before the
    /// abort unregisters the callback.
    pub fn on_abort(&self, callback: impl FnOnce() + Send + 'static) -> Disposer {
        let mut callbacks = lock_or_recover(&self.state.callbacks, "abort callbacks");
        // Checked under the callbacks lock: abort() drains under the same lock
        if self.is_aborted() {
            drop(callbacks);
            run_callback(Box::new(callback));
            return Disposer::noop();
        }

        let id = self.state.next_callback.fetch_add(1, Ordering::Relaxed);
        callbacks.insert(id, Box::new(callback));
        drop(callbacks);

        let state = Arc::downgrade(&self.state);
        Disposer::new("abort-callback", move || {
            if let Some(state) = state.upgrade() {
                lock_or_recover(&state.callbacks, "abort callbacks").remove(&id);
            }
        })
    }

    /// Resolves once the signal has aborted
    pub async fn aborted(&self) {
        let mut rx = self.state.tx.subscribe();
        // The sender lives in `state`, which `self` keeps alive
        let _ = rx.wait_for(|aborted| *aborted).await;
    }

    /// `Err(PluginError::Aborted)` once the signal has aborted
    pub fn throw_if_aborted(&self) -> PluginResult<()> {
        if self.is_aborted() {
            Err(PluginError::Aborted {
                reason: self.reason().unwrap_or_else(|| "aborted".to_string()),
            })
        } else {
            Ok(())
        }
    }
}

fn run_callback(callback: AbortCallback) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(callback)) {
        report_panic(ErrorOrigin::AbortCallback, "abort-callback", payload.as_ref());
    }
}

/// Write side of an abort
#[derive(Debug)]
pub struct AbortController {
    signal: AbortSignal,
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl AbortController {
    pub fn new() -> Self {
        Self {
            signal: AbortSignal::new(),
        }
    }

    pub fn signal(&self) -> AbortSignal {
        self.signal.clone()
    }

    /// Abort the signal, running registered callbacks in registration order
    ///
    /// Returns false if the signal had already been aborted.
    pub fn abort(&self, reason: impl Into<String>) -> bool {
        let state = &self.signal.state;
        let callbacks = {
            let mut callbacks = lock_or_recover(&state.callbacks, "abort callbacks");
            if state
                .aborted
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return false;
            }
            *lock_or_recover(&state.reason, "abort reason") = Some(reason.into());
            std::mem::take(&mut *callbacks)
        };

        state.tx.send_replace(true);
        log::trace!("Abort signal fired, running {} callback(s)", callbacks.len());
        for callback in callbacks.into_values() {
            run_callback(callback);
        }
        true
    }
}
