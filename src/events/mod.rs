//! Event Bus Module
//!
//! Named, string-keyed publish/subscribe with per-registration disposal and
//! snapshot-at-call emission. The bus underpins every `AppRegistry` and the
//! action and store helpers.

// Internal modules - all access should go through api module
pub(crate) mod bus;
pub(crate) mod error;

// Public API module - the only public interface for the event bus
pub mod api;
