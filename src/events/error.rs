//! Event bus error types
//!
//! These never reach the caller of `emit`; they describe listener failures
//! as they are reported to the error channel.

use crate::core::error_handling::ContextualError;
use crate::events::bus::HandlerError;

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Listener for '{event}' failed: {source}")]
    ListenerFailed {
        event: String,
        #[source]
        source: HandlerError,
    },

    #[error("Listener for '{event}' panicked: {message}")]
    ListenerPanicked { event: String, message: String },
}

impl ContextualError for EventError {
    fn is_user_actionable(&self) -> bool {
        false // Listener failures are programming errors in the listener
    }

    fn user_message(&self) -> Option<String> {
        None
    }
}
