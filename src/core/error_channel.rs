//! Process-wide error channel
//!
//! Failures that must never propagate to the caller (a listener failing during
//! `emit`, a disposer panicking during teardown, an abort callback blowing up)
//! end up here. Every report is logged at error level and forwarded to every
//! live subscriber. Subscribers whose receiving side has been dropped are
//! removed on the next report.

use crate::core::sync::lock_or_recover;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::sync::{LazyLock, Mutex};
use strum_macros::Display;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Where a reported failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorOrigin {
    /// An event listener returned an error or panicked during `emit`
    Listener,
    /// A disposer panicked while undoing its registration
    Disposer,
    /// A callback registered with `AbortSignal::on_abort` panicked
    AbortCallback,
    /// A plugin-provided deactivate hook panicked
    PluginHook,
    /// An observable store could not serialize its state
    Store,
}

/// A single failure delivered through the error channel
#[derive(Debug, Clone)]
pub struct ReportedError {
    pub origin: ErrorOrigin,
    /// What was running, e.g. `"listener:collection-dropped"`
    pub context: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

static SUBSCRIBERS: LazyLock<Mutex<Vec<UnboundedSender<ReportedError>>>> = LazyLock::new(|| {
    log::trace!("Initializing error channel");
    Mutex::new(Vec::new())
});

/// Subscribe to every failure reported from now on
pub fn subscribe() -> UnboundedReceiver<ReportedError> {
    let (sender, receiver) = unbounded_channel();
    lock_or_recover(&SUBSCRIBERS, "error channel").push(sender);
    receiver
}

/// Report a failure
pub fn report(origin: ErrorOrigin, context: impl Into<String>, message: impl Into<String>) {
    let reported = ReportedError {
        origin,
        context: context.into(),
        message: message.into(),
        timestamp: Utc::now(),
    };

    log::error!(
        "{} failure in '{}': {}",
        reported.origin,
        reported.context,
        reported.message
    );

    let mut subscribers = lock_or_recover(&SUBSCRIBERS, "error channel");
    subscribers.retain(|sender| sender.send(reported.clone()).is_ok());
}

/// Report a failure carried by an error value
pub fn report_error(
    origin: ErrorOrigin,
    context: impl Into<String>,
    error: &(dyn std::error::Error + 'static),
) {
    report(origin, context, error.to_string());
}

/// Report a caught panic
pub fn report_panic(origin: ErrorOrigin, context: impl Into<String>, payload: &(dyn Any + Send)) {
    report(origin, context, format!("panicked: {}", panic_message(payload)));
}

/// Extract the human readable part of a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
