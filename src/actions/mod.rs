//! Actions Module
//!
//! Named action sets and observable stores, the two building blocks plugins
//! use to expose behaviour and state to the rest of the application.

// Internal modules - all access should go through api module
pub(crate) mod action_set;
pub(crate) mod error;
pub(crate) mod store;

// Public API module - the only public interface for actions and stores
pub mod api;
