//! Unit tests for the RPC handler, covering the JSON-RPC methods dispatched by `handle_method`.
//!
//! These tests go through the same code path as the `tabdesk-rpc` binary, with
//! settings in a temp directory and the default in-memory storage medium.

use std::sync::Mutex;

use serde_json::{json, Value};
use tempfile::TempDir;

use tabdesk::app::App;
use tabdesk::managers::tab_manager::TabManagerTrait;
use tabdesk::rpc_handler::handle_method;
use tabdesk::services::identity::SessionIdentityProvider;
use tabdesk::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Create a fresh App with its settings file in a temp directory.
fn setup() -> (Mutex<App>, TempDir) {
    let tmp = TempDir::new().unwrap();
    let settings = tmp.path().join("settings.json").to_string_lossy().to_string();
    let app = App::new(Some(settings)).unwrap();
    (Mutex::new(app), tmp)
}

fn call(app: &Mutex<App>, method: &str, params: Value) -> Value {
    handle_method(app, method, &params).unwrap()
}

fn open(app: &Mutex<App>, code: &str) -> String {
    let tab = call(
        app,
        "tab.open",
        json!({"taskCode": code, "title": code, "url": format!("/{}", code), "options": {"taskType": "REPORT"}}),
    );
    tab["id"].as_str().unwrap().to_string()
}

// ─── Ping / unknown ───

#[test]
fn test_ping() {
    let (app, _tmp) = setup();
    let res = call(&app, "ping", json!({}));
    assert_eq!(res["pong"], true);
}

#[test]
fn test_unknown_method_returns_error() {
    let (app, _tmp) = setup();
    let res = handle_method(&app, "nonexistent.method", &json!({}));
    assert!(res.unwrap_err().contains("unknown method"));
}

#[test]
fn test_app_opens_from_loaded_settings() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.json");
    std::fs::write(&path, r#"{"workspace": {"maxTabs": 2}}"#).unwrap();
    let mut engine = SettingsEngine::new(Some(path.to_string_lossy().to_string()));
    engine.load().unwrap();

    let app = App::open(engine).unwrap();

    assert_eq!(app.tab_manager.config().max_tabs, 2);
}

// ─── Tabs ───

#[test]
fn test_tab_open_returns_tab() {
    let (app, _tmp) = setup();
    let tab = call(&app, "tab.open", json!({"taskCode": "T1", "title": "Task One", "url": "/t1"}));
    assert_eq!(tab["taskCode"], "T1");
    assert_eq!(tab["order"], 0);
    assert_eq!(tab["isActive"], true);
    assert_eq!(tab["state"], "LOADING");
}

#[test]
fn test_tab_open_missing_params() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "tab.open", &json!({"title": "x", "url": "/x"})).unwrap_err();
    assert_eq!(err, "missing taskCode");
}

#[test]
fn test_tab_open_capacity_error() {
    let (app, _tmp) = setup();
    call(&app, "config.set", json!({"config": {"maxTabs": 1}}));
    open(&app, "A");
    let err = handle_method(&app, "tab.open", &json!({"taskCode": "B", "title": "B", "url": "/b"})).unwrap_err();
    assert!(err.contains("Tab limit reached"));
}

#[test]
fn test_tab_open_task() {
    let (app, _tmp) = setup();
    let tab = call(
        &app,
        "tab.openTask",
        json!({"task": {"taskCode": "ORD", "caption": "Orders", "url": "/orders", "menuCode": "SALES"}}),
    );
    assert_eq!(tab["title"], "Orders");
    assert_eq!(tab["metadata"]["menuCode"], "SALES");
}

#[test]
fn test_tab_close_and_snapshot() {
    let (app, _tmp) = setup();
    let a = open(&app, "A");
    let b = open(&app, "B");

    assert_eq!(call(&app, "tab.close", json!({"tabId": b}))["closed"], true);
    assert_eq!(call(&app, "tab.close", json!({"tabId": "ghost"}))["closed"], false);

    let ws = call(&app, "workspace.snapshot", json!({}));
    assert_eq!(ws["tabs"].as_array().unwrap().len(), 1);
    assert_eq!(ws["activeTabId"], a);
}

#[test]
fn test_tab_close_unsaved_needs_force() {
    let (app, _tmp) = setup();
    let a = open(&app, "A");
    call(&app, "tab.setUnsaved", json!({"tabId": a, "dirty": true}));

    assert_eq!(call(&app, "tab.close", json!({"tabId": a}))["closed"], false);
    assert_eq!(call(&app, "tab.close", json!({"tabId": a, "force": true}))["closed"], true);
}

#[test]
fn test_tab_close_others_and_all() {
    let (app, _tmp) = setup();
    let a = open(&app, "A");
    open(&app, "B");
    open(&app, "C");

    assert_eq!(call(&app, "tab.closeOthers", json!({"tabId": a}))["closed"], 2);
    assert_eq!(call(&app, "tab.closeAll", json!({"excludeHome": true}))["closed"], 1);
}

#[test]
fn test_tab_close_all_spares_home_by_default() {
    let (app, _tmp) = setup();
    call(&app, "config.set", json!({"config": {"homeTabClosable": true}}));
    let home = open(&app, "HOME");
    open(&app, "A");

    assert_eq!(call(&app, "tab.closeAll", json!({}))["closed"], 1);

    let a = app.lock().unwrap();
    assert_eq!(a.tab_manager.tab_count(), 1);
    assert_eq!(a.tab_manager.get_all_tabs()[0].id, home);
    assert!(a.tab_manager.get_all_tabs()[0].is_closable);
}

#[test]
fn test_tab_close_all_with_home_excluded_false() {
    let (app, _tmp) = setup();
    call(&app, "config.set", json!({"config": {"homeTabClosable": true}}));
    open(&app, "HOME");
    open(&app, "A");

    assert_eq!(call(&app, "tab.closeAll", json!({"excludeHome": false}))["closed"], 2);
}

#[test]
fn test_tab_view_operations() {
    let (app, _tmp) = setup();
    let a = open(&app, "A");
    let b = open(&app, "B");

    assert_eq!(call(&app, "tab.activate", json!({"tabId": a}))["ok"], true);
    assert_eq!(call(&app, "tab.minimize", json!({"tabId": b}))["ok"], true);
    assert_eq!(call(&app, "tab.restore", json!({"tabId": b}))["ok"], true);
    assert_eq!(call(&app, "tab.maximize", json!({"tabId": b}))["ok"], true);
    assert_eq!(call(&app, "tab.restoreMaximized", json!({}))["ok"], true);
    assert_eq!(call(&app, "tab.togglePin", json!({"tabId": a}))["ok"], true);
    assert_eq!(call(&app, "tab.reorder", json!({"fromIndex": 0, "toIndex": 1}))["ok"], true);

    let ws = call(&app, "workspace.snapshot", json!({}));
    assert_eq!(ws["tabs"][0]["id"], b);
    assert_eq!(ws["tabs"][1]["isPinned"], true);
}

#[test]
fn test_tab_update_state_and_patch() {
    let (app, _tmp) = setup();
    let a = open(&app, "A");

    call(&app, "tab.updateState", json!({"tabId": a, "state": "ERROR", "error": "timeout"}));
    call(&app, "tab.update", json!({"tabId": a, "patch": {"title": "Renamed"}}));

    let a_guard = app.lock().unwrap();
    let tab = a_guard.tab_manager.get_tab(&a).unwrap();
    assert_eq!(tab.error.as_deref(), Some("timeout"));
    assert_eq!(tab.title, "Renamed");
}

#[test]
fn test_tab_update_state_unknown_tab() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "tab.updateState", &json!({"tabId": "x", "state": "LOADED"})).unwrap_err();
    assert_eq!(err, "Tab not found: x");
}

#[test]
fn test_invalid_state_value() {
    let (app, _tmp) = setup();
    let a = open(&app, "A");
    let err = handle_method(&app, "tab.updateState", &json!({"tabId": a, "state": "BROKEN"})).unwrap_err();
    assert!(err.starts_with("invalid state"));
}

// ─── Compare ───

#[test]
fn test_compare_methods() {
    let (app, _tmp) = setup();
    let a = open(&app, "A");
    let b = open(&app, "B");

    assert_eq!(call(&app, "compare.add", json!({"tabId": a}))["ok"], true);
    assert_eq!(call(&app, "compare.add", json!({"tabId": b}))["ok"], true);
    assert_eq!(call(&app, "compare.setMode", json!({"mode": "grid"}))["ok"], true);
    assert_eq!(call(&app, "compare.remove", json!({"tabId": a}))["ok"], true);

    let ws = call(&app, "workspace.snapshot", json!({}));
    assert_eq!(ws["compareMode"], "grid");
    assert_eq!(ws["compareTabIds"], json!([b]));

    assert_eq!(call(&app, "compare.clear", json!({}))["ok"], true);
    let ws = call(&app, "workspace.snapshot", json!({}));
    assert_eq!(ws["compareMode"], "none");
}

// ─── Config ───

#[test]
fn test_config_get_and_set() {
    let (app, _tmp) = setup();
    assert_eq!(call(&app, "config.get", json!({}))["maxTabs"], 10);

    let updated = call(&app, "config.set", json!({"config": {"maxTabs": 3, "allowDuplicates": true}}));
    assert_eq!(updated["maxTabs"], 3);
    assert_eq!(updated["allowDuplicates"], true);

    let a = app.lock().unwrap();
    assert_eq!(a.settings_engine.get_settings().workspace.max_tabs, 3);
}

#[test]
fn test_config_set_rejects_below_open_tabs() {
    let (app, _tmp) = setup();
    open(&app, "A");
    open(&app, "B");
    let err = handle_method(&app, "config.set", &json!({"config": {"maxTabs": 1}})).unwrap_err();
    assert!(err.contains("Invalid workspace config"));
}

// ─── Session ───

#[test]
fn test_login_logout() {
    let (app, _tmp) = setup();
    call(
        &app,
        "session.login",
        json!({"sessionId": "s1", "userName": "jdoe", "businessUnit": "BU01"}),
    );
    let tab = call(&app, "tab.open", json!({"taskCode": "A", "title": "A", "url": "/a"}));
    assert_eq!(tab["metadata"]["userName"], "jdoe");

    call(&app, "session.logout", json!({}));

    let a = app.lock().unwrap();
    assert_eq!(a.tab_manager.tab_count(), 0);
    assert!(a.identity.current().is_none());
}

#[test]
fn test_login_requires_identity_fields() {
    let (app, _tmp) = setup();
    let err = handle_method(&app, "session.login", &json!({"userName": "jdoe"})).unwrap_err();
    assert!(err.starts_with("invalid identity"));
}

#[test]
fn test_session_restore_reloads_persisted_tabs() {
    let (app, _tmp) = setup();
    open(&app, "A");
    open(&app, "B");

    let restored = call(&app, "session.restore", json!({}));
    assert_eq!(restored["restored"], 2);
}
