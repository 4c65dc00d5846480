//! CLI TOML configuration tests

use app_registry::app::cli::config::{load_config, ConfigError};
use app_registry::core::error_handling::ContextualError;
use app_registry::plugin::api::RegistryTarget;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("app-registry.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_plugins_and_logging_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[logging]
level = "warn"
file = "none"

[[plugin]]
name = "event-log"
events = ["open", "close"]
scope = "local"
limit = 3
"#,
    );

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.logging.level.as_deref(), Some("warn"));
    assert_eq!(config.logging.file.as_deref(), Some("none"));

    let plugin = &config.plugins[0];
    assert_eq!(plugin.name, "event-log");
    assert_eq!(plugin.events, vec!["open", "close"]);
    assert_eq!(plugin.scope, RegistryTarget::Local);
    assert_eq!(plugin.limit, Some(3));
}

#[test]
fn test_malformed_file_reports_its_path() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[[plugin]\nname = ");

    let error = load_config(Some(&path)).unwrap_err();
    assert!(matches!(error, ConfigError::Parse { .. }));
    assert!(error.is_user_actionable());
    assert!(error.to_string().contains("app-registry.toml"));
}

#[test]
fn test_unknown_plugin_scope_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[[plugin]]\nname = \"event-log\"\nscope = \"session\"");

    assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse { .. })));
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let error = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(error, ConfigError::NotFound { .. }));
}
