//! Generic error handling utilities
//!
//! Every error enum in this crate implements [`ContextualError`] so the
//! binary can decide how much of a failure to show: configuration and lookup
//! mistakes are the operator's to fix and are shown verbatim, everything else
//! is summarised with the detail pushed to debug level.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)`. When it returns `false`, `user_message()` returns `None`.
pub trait ContextualError: std::error::Error {
    /// True if the message is meant to be displayed directly to the operator
    fn is_user_actionable(&self) -> bool;

    /// The operator-facing message for user-actionable errors
    fn user_message(&self) -> Option<String>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// User-actionable errors are logged with their own message; system errors are
/// logged with the operation context only. The full error is always available
/// at debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {}", operation_context),
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Log a fatal error and map it to a process exit code
///
/// User-actionable failures exit with 2 (usage/configuration), system
/// failures with 1.
pub fn fatal_exit_code<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) -> i32 {
    log_error_with_context(error, operation_context);
    if error.is_user_actionable() {
        2
    } else {
        1
    }
}
