pub mod actions;
pub mod app;
pub mod context;
pub mod core;
pub mod events;
pub mod plugin;
pub mod registry;
