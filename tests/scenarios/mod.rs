//! Registry scenario modules

pub mod event_bus;
pub mod lifecycle;
pub mod provider;
pub mod registry;
