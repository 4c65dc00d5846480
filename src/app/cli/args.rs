//! Command line arguments
//!
//! Global options come first and override the configuration file; the
//! subcommand selects what to do.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "app-registry")]
#[command(about = "Activate registry plugins, emit events and report what they saw")]
#[command(version, long_version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<String>,

    /// Force coloured output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the builtin plugins
    Plugins,

    /// Activate plugins, emit events, then unmount and report
    Run(RunArgs),
}

#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct RunArgs {
    /// Extra plugin to activate; it listens to every emitted event
    #[arg(short = 'p', long = "plugin", value_name = "NAME")]
    pub plugins: Vec<String>,

    /// Event to emit, optionally with a JSON payload (array = several arguments)
    #[arg(short = 'e', long = "emit", value_name = "EVENT[=JSON]")]
    pub emit: Vec<String>,

    /// Print the report as JSON
    #[arg(long = "json")]
    pub json: bool,
}

impl Args {
    /// Colour choice from the command line: `Some(true)` for `--color`,
    /// `Some(false)` for `--no-color`, `None` when unspecified
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
