//! App Registry Module
//!
//! Composite registries of event bus, components, roles and stores, scoped to
//! either the whole process (the global registry) or one UI region (local
//! registries). Registries also track the plugin lifecycle scopes activated
//! against them so that deactivating a registry tears those plugins down.

// Internal modules - all access should go through api module
pub(crate) mod app_registry;
pub(crate) mod handles;
pub(crate) mod keyed;
pub(crate) mod names;
pub(crate) mod roles;

// Public API module - the only public interface for the registry
pub mod api;
