//! Public API for provider scopes
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::context::provider::{ContextError, LocalRegistry, Ownership, ProviderScope};
