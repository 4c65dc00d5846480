//! Application module

pub mod cli;
pub mod display;
pub mod error;
pub mod run;
pub mod startup;
