//! Application startup
//!
//! Parses the command line, loads the configuration file, initialises
//! logging and dispatches to the selected command. Returns the process exit
//! code.

use crate::app::cli::args::{Args, Command};
use crate::app::cli::config::{load_config, AppConfig};
use crate::app::display::{print_plugins, print_report};
use crate::app::error::AppError;
use crate::app::run::run_plugins;
use crate::core::error_handling::fatal_exit_code;
use crate::core::logging::{init_logging, LogFormat, LoggingOptions};
use crate::core::version::long_version;
use crate::plugin::api::builtin_plugins;
use crate::registry::api::global_app_registry;
use clap::Parser;
use std::io::IsTerminal;
use std::str::FromStr;

/// Command line values win over the configuration file
fn logging_options(args: &Args, config: &AppConfig, use_color: bool) -> LoggingOptions {
    let defaults = LoggingOptions::default();
    let format = args
        .log_format
        .as_deref()
        .or(config.logging.format.as_deref())
        .and_then(|format| LogFormat::from_str(format).ok())
        .unwrap_or(defaults.format);

    LoggingOptions {
        level: args
            .log_level
            .clone()
            .or_else(|| config.logging.level.clone())
            .unwrap_or(defaults.level),
        format,
        file: args.log_file.clone().or_else(|| config.logging.file.clone()),
        color: use_color,
    }
}

pub fn startup() -> i32 {
    let args = Args::parse();

    // Logging is not up yet, so configuration problems go straight to stderr
    let config = match load_config(args.config_file.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {}", error);
            return 2;
        }
    };

    let use_color = args
        .color_choice()
        .or(config.logging.color)
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    colored::control::set_override(use_color);

    if let Err(error) = init_logging(&logging_options(&args, &config, use_color)) {
        eprintln!("Error: failed to initialise logging: {}", error);
        return 1;
    }
    log::debug!("app-registry {}", long_version());

    match args.command.clone().unwrap_or(Command::Plugins) {
        Command::Plugins => {
            print_plugins(&builtin_plugins(), use_color);
            0
        }
        Command::Run(run) => {
            let result = run_plugins(global_app_registry(), &config, &run).and_then(|report| {
                if run.json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_report(&report, use_color);
                }
                Ok::<_, AppError>(())
            });
            match result {
                Ok(()) => 0,
                Err(error) => fatal_exit_code(&error, "Run failed"),
            }
        }
    }
}
