//! Plugin System Module
//!
//! Plugin activation and lifecycle management. A plugin is activated inside a
//! `PluginLifecycleScope` which tracks every listener and cleanup the plugin
//! registers, tears them down in order on deactivation, and fires the scope's
//! abort signal. Builtin plugins are discovered through an inventory-backed
//! catalog.

// Internal modules - all access should go through api module
pub(crate) mod builtin;
pub(crate) mod catalog;
pub(crate) mod error;
pub(crate) mod helpers;
pub(crate) mod lifecycle;
pub(crate) mod signal;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the plugin system
pub mod api;

#[cfg(test)]
mod tests;
