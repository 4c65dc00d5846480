//! Public API for the event bus
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::events::bus::{EventBus, EventTarget, Handler, HandlerError, HandlerResult};
pub use crate::events::error::EventError;

// Every registration returns a disposer
pub use crate::core::cleanup::Disposer;
