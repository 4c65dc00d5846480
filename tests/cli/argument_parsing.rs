//! CLI argument parsing tests

use app_registry::app::cli::args::*;
use app_registry::app::cli::emit::EmitSpec;
use clap::Parser;
use serde_json::json;

#[test]
fn test_no_subcommand_defaults_to_listing() {
    let args = Args::try_parse_from(["app-registry"]).unwrap();
    assert_eq!(args.command, None);
    assert_eq!(args.color_choice(), None);
}

#[test]
fn test_run_with_repeated_plugins_and_events() {
    let args = Args::try_parse_from([
        "app-registry",
        "--log-level",
        "debug",
        "run",
        "-p",
        "event-log",
        "--plugin",
        "event-counter",
        "-e",
        "open",
        "--emit",
        "close=[1,2]",
        "--json",
    ])
    .unwrap();

    assert_eq!(args.log_level.as_deref(), Some("debug"));
    let Some(Command::Run(run)) = args.command else {
        panic!("expected the run command");
    };
    assert_eq!(run.plugins, vec!["event-log", "event-counter"]);
    assert_eq!(run.emit, vec!["open", "close=[1,2]"]);
    assert!(run.json);
}

#[test]
fn test_rejected_values() {
    assert!(Args::try_parse_from(["app-registry", "--log-level", "loud"]).is_err());
    assert!(Args::try_parse_from(["app-registry", "--log-format", "xml"]).is_err());
    assert!(Args::try_parse_from(["app-registry", "--color", "--no-color"]).is_err());
    assert!(Args::try_parse_from(["app-registry", "unknown"]).is_err());
}

#[test]
fn test_color_flags() {
    let args = Args::try_parse_from(["app-registry", "--no-color", "plugins"]).unwrap();
    assert_eq!(args.color_choice(), Some(false));
    assert_eq!(args.command, Some(Command::Plugins));

    let args = Args::try_parse_from(["app-registry", "-g"]).unwrap();
    assert_eq!(args.color_choice(), Some(true));
}

#[test]
fn test_emit_values() {
    let spec: EmitSpec = "open".parse().unwrap();
    assert!(spec.args.is_empty());

    let spec: EmitSpec = "close=[1,\"two\"]".parse().unwrap();
    assert_eq!(spec.event, "close");
    assert_eq!(spec.args, vec![json!(1), json!("two")]);

    let spec: EmitSpec = "select={\"id\":3}".parse().unwrap();
    assert_eq!(spec.args, vec![json!({"id": 3})]);

    assert!("=1".parse::<EmitSpec>().is_err());
    assert!("open=[".parse::<EmitSpec>().is_err());
}
