//! Core services and infrastructure

pub mod cleanup;
pub mod error_channel;
pub mod error_handling;
pub mod logging;
pub mod sync;
pub mod version;
