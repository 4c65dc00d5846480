//! Built-in Plugin Implementations
//!
//! Plugins that ship with the crate. Each registers itself with
//! `builtin_plugin!` and is picked up by the catalog at runtime.

pub mod event_counter;
pub mod event_log;
