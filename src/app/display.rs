//! Table output for the CLI

use crate::app::run::RunReport;
use crate::plugin::api::PluginInfo;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};

fn header_row(titles: &[&str], use_color: bool) -> Row {
    Row::new(
        titles
            .iter()
            .map(|title| {
                let cell = Cell::new(title);
                if use_color {
                    cell.style_spec("bFy")
                } else {
                    cell.style_spec("b")
                }
            })
            .collect(),
    )
}

fn new_table(titles: &[&str], use_color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(header_row(titles, use_color));
    table
}

pub fn plugin_table(plugins: &[PluginInfo], use_color: bool) -> Table {
    let mut table = new_table(&["Plugin", "API", "Description"], use_color);
    for plugin in plugins {
        table.add_row(Row::new(vec![
            Cell::new(&plugin.name),
            Cell::new(&plugin.api_version.to_string()),
            Cell::new(&plugin.description),
        ]));
    }
    table
}

pub fn print_plugins(plugins: &[PluginInfo], use_color: bool) {
    if plugins.is_empty() {
        eprintln!("No builtin plugins available.");
        return;
    }
    plugin_table(plugins, use_color).printstd();
}

pub fn events_table(report: &RunReport, use_color: bool) -> Table {
    let mut table = new_table(&["Event", "Global", "Local"], use_color);
    for emitted in &report.emitted {
        table.add_row(Row::new(vec![
            Cell::new(&emitted.event),
            Cell::new(&emitted.global_listeners.to_string()),
            Cell::new(&emitted.local_listeners.to_string()),
        ]));
    }
    table
}

pub fn plugins_report_table(report: &RunReport, use_color: bool) -> Table {
    let mut table = new_table(&["Plugin", "Scope", "State", "Store"], use_color);
    for plugin in &report.plugins {
        let store = plugin
            .store
            .as_ref()
            .map_or_else(|| "-".to_string(), |value| value.to_string());
        table.add_row(Row::new(vec![
            Cell::new(&plugin.name),
            Cell::new(&plugin.scope.to_string()),
            Cell::new(&plugin.state),
            Cell::new(&store),
        ]));
    }
    table
}

pub fn print_report(report: &RunReport, use_color: bool) {
    if report.emitted.is_empty() {
        println!("No events emitted.");
    } else {
        events_table(report, use_color).printstd();
    }
    println!();
    plugins_report_table(report, use_color).printstd();

    if !report.errors.is_empty() {
        println!();
        for error in &report.errors {
            if use_color {
                println!("{} {}", "error:".red().bold(), error);
            } else {
                println!("error: {}", error);
            }
        }
    }
}
