//! CLI Integration Test Modules

pub mod argument_parsing;
pub mod run_command;
pub mod toml_config;
