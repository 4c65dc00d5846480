//! Synchronization utilities for robust lock handling
//!
//! Registry state is plain maps guarded by `std::sync` locks. User code
//! (listeners, disposers, plugin hooks) never runs while one of these locks is
//! held. A poisoned lock is logged and its inner data used as is.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Lock a mutex, recovering the guard if a previous holder panicked
pub fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        log::warn!(
            "Internal synchronisation error (mutex poisoned) on {}; continuing with recovered state",
            what
        );
        poisoned.into_inner()
    })
}

/// Acquire a read lock, recovering the guard if a writer panicked
pub fn read_or_recover<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        log::warn!(
            "Internal synchronisation error (RwLock read poisoned) on {}; continuing with recovered state",
            what
        );
        poisoned.into_inner()
    })
}

/// Acquire a write lock, recovering the guard if a previous holder panicked
pub fn write_or_recover<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        log::warn!(
            "Internal synchronisation error (RwLock write poisoned) on {}; continuing with recovered state",
            what
        );
        poisoned.into_inner()
    })
}
