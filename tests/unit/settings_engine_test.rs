//! Integration-level unit tests for the SettingsEngine public API.
//!
//! These tests exercise the SettingsEngine through its public trait interface,
//! validating default loading, dot-path updates, persistence and reset.

use serde_json::json;
use tempfile::TempDir;

use tabdesk::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabdesk::types::errors::SettingsError;
use tabdesk::types::settings::{ShellSettings, StorageBackend, DEFAULT_STORAGE_KEY};
use tabdesk::types::workspace::WorkspaceConfig;

/// Helper: a SettingsEngine backed by a temp directory the caller keeps alive.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir
        .path()
        .join("settings.json")
        .to_string_lossy()
        .to_string();
    SettingsEngine::new(Some(path))
}

#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings, ShellSettings::default());
    assert_eq!(settings.workspace.max_tabs, 10);
    assert_eq!(settings.storage.key, DEFAULT_STORAGE_KEY);
    assert_eq!(settings.logging.filter, "info");
}

#[test]
fn test_set_value_persists_changes() {
    let dir = TempDir::new().unwrap();
    {
        let mut engine = engine_in_temp(&dir);
        engine.load().unwrap();
        engine.set_value("workspace.maxTabs", json!(4)).unwrap();
        engine.set_value("storage.backend", json!("sqlite")).unwrap();
    }

    let mut reloaded = engine_in_temp(&dir);
    let settings = reloaded.load().unwrap();
    assert_eq!(settings.workspace.max_tabs, 4);
    assert_eq!(settings.storage.backend, StorageBackend::Sqlite);
}

#[test]
fn test_set_value_rejects_unknown_and_malformed_keys() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    for key in ["", "workspace.", "workspace.nope", "nope.maxTabs", "workspace.maxTabs.deep"] {
        assert!(
            matches!(engine.set_value(key, json!(1)), Err(SettingsError::InvalidKey(_))),
            "key {:?} should be rejected",
            key
        );
    }
}

#[test]
fn test_set_value_rejects_wrong_type_and_invalid_values() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    assert!(matches!(
        engine.set_value("workspace.maxTabs", json!("many")),
        Err(SettingsError::InvalidValue(_))
    ));
    assert!(matches!(
        engine.set_value("workspace.maxTabs", json!(0)),
        Err(SettingsError::InvalidValue(_))
    ));
    assert_eq!(engine.get_settings().workspace.max_tabs, 10);
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
    let mut engine = engine_in_temp(&dir);

    assert!(matches!(
        engine.load(),
        Err(SettingsError::SerializationError(_))
    ));
}

#[test]
fn test_partial_file_fills_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("settings.json"),
        r#"{"workspace": {"maxTabs": 3}, "audit": {"endpoint": "http://audit.local"}}"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);

    let settings = engine.load().unwrap();

    assert_eq!(settings.workspace.max_tabs, 3);
    assert!(settings.workspace.persist_tabs);
    assert_eq!(settings.audit.endpoint.as_deref(), Some("http://audit.local"));
    assert_eq!(settings.storage.backend, StorageBackend::Memory);
}

#[test]
fn test_set_workspace_config() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();

    let config = WorkspaceConfig {
        allow_duplicates: true,
        ..WorkspaceConfig::default()
    };
    engine.set_workspace_config(config.clone()).unwrap();

    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap().workspace, config);
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine.set_value("logging.filter", json!("debug")).unwrap();

    engine.reset().unwrap();

    assert_eq!(engine.get_settings(), &ShellSettings::default());
    let mut reloaded = engine_in_temp(&dir);
    assert_eq!(reloaded.load().unwrap(), ShellSettings::default());
}

#[test]
fn test_config_path_override() {
    let dir = TempDir::new().unwrap();
    let engine = engine_in_temp(&dir);
    assert!(engine.get_config_path().ends_with("settings.json"));
}
