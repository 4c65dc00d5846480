//! Registry Context Module
//!
//! Provider scopes select which app registries a UI region sees and decide
//! who deactivates the local registry when the region goes away.

// Internal modules - all access should go through api module
pub(crate) mod provider;

// Public API module - the only public interface for provider scopes
pub mod api;
