//! Disposers
//!
//! Every registration made through this crate (event listeners, abort
//! callbacks, plugin cleanups) hands back a [`Disposer`]: a zero-argument
//! action that undoes exactly that registration, exactly once. A
//! [`DisposerSet`] collects disposers for ordered teardown.

use crate::core::error_channel::{report_panic, ErrorOrigin};
use crate::core::sync::lock_or_recover;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

type DisposeFn = Box<dyn FnOnce() + Send + 'static>;

/// Undoes exactly one registration
///
/// Disposing runs the wrapped action at most once; later calls are no-ops.
/// A panic inside the action is caught and reported to the error channel.
/// Dropping a disposer without calling [`Disposer::dispose`] leaves the
/// registration in place.
pub struct Disposer {
    label: String,
    action: Mutex<Option<DisposeFn>>,
}

impl Disposer {
    pub fn new(label: impl Into<String>, action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            label: label.into(),
            action: Mutex::new(Some(Box::new(action))),
        }
    }

    /// A disposer with nothing left to undo
    pub fn noop() -> Self {
        Self {
            label: "noop".to_string(),
            action: Mutex::new(None),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_disposed(&self) -> bool {
        lock_or_recover(&self.action, "disposer").is_none()
    }

    /// Undo the registration. Returns true if this call did the work.
    pub fn dispose(&self) -> bool {
        // Take the action first so the lock is not held while it runs
        let action = lock_or_recover(&self.action, "disposer").take();
        match action {
            Some(action) => {
                log::trace!("Disposing '{}'", self.label);
                if let Err(payload) = catch_unwind(AssertUnwindSafe(action)) {
                    report_panic(ErrorOrigin::Disposer, self.label.as_str(), payload.as_ref());
                }
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("label", &self.label)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Ordered collection of disposers, torn down first-in first-out
#[derive(Debug, Default)]
pub struct DisposerSet {
    disposers: Vec<Disposer>,
}

impl DisposerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, disposer: Disposer) {
        self.disposers.push(disposer);
    }

    pub fn len(&self) -> usize {
        self.disposers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disposers.is_empty()
    }

    /// Move the disposers out, leaving this set empty
    pub fn take(&mut self) -> DisposerSet {
        DisposerSet {
            disposers: std::mem::take(&mut self.disposers),
        }
    }

    /// Dispose everything in registration order; returns how many did work
    pub fn dispose_all(&mut self) -> usize {
        self.disposers
            .drain(..)
            .filter(|disposer| disposer.dispose())
            .count()
    }
}
