//! RPC method handler for the tabdesk JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` dispatches one call to the tab manager, compare-mode
//! coordinator, session or config through the `App` struct.

use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::app::App;
use crate::managers::compare::CompareModeTrait;
use crate::managers::tab_manager::TabManagerTrait;
use crate::types::tab::{OpenTabOptions, TabPatch, TabState};
use crate::types::task::{SessionIdentity, TaskDescriptor};
use crate::types::workspace::{CompareMode, WorkspaceConfig};

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn index_param(params: &Value, name: &str) -> Result<usize, String> {
    params
        .get(name)
        .and_then(|v| v.as_u64())
        .map(|v| v as usize)
        .ok_or_else(|| format!("missing {}", name))
}

fn bool_param(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(|v| v.as_bool()).unwrap_or(default)
}

/// Deserializes `params[name]`, falling back to `T::default()` when absent.
fn optional_param<T: DeserializeOwned + Default>(params: &Value, name: &str) -> Result<T, String> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| format!("invalid {}: {}", name, e)),
    }
}

fn required_param<T: DeserializeOwned>(params: &Value, name: &str) -> Result<T, String> {
    let v = params.get(name).ok_or_else(|| format!("missing {}", name))?;
    serde_json::from_value(v.clone()).map_err(|e| format!("invalid {}: {}", name, e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),

        "workspace.snapshot" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(a.tab_manager.snapshot().as_ref())
        }

        // ─── Tabs ───
        "tab.open" => {
            let task_code = str_param(params, "taskCode")?;
            let title = str_param(params, "title")?;
            let url = str_param(params, "url")?;
            let options: OpenTabOptions = optional_param(params, "options")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let tab = a
                .tab_manager
                .open_tab(task_code, title, url, options)
                .map_err(|e| e.to_string())?;
            to_json(&tab)
        }
        "tab.openTask" => {
            let task: TaskDescriptor = required_param(params, "task")?;
            let options: OpenTabOptions = optional_param(params, "options")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let tab = a.tab_manager.open_task(&task, options).map_err(|e| e.to_string())?;
            to_json(&tab)
        }
        "tab.close" => {
            let id = str_param(params, "tabId")?;
            let force = bool_param(params, "force", false);
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let closed = a.tab_manager.close_tab(id, force).map_err(|e| e.to_string())?;
            Ok(json!({"closed": closed}))
        }
        "tab.closeOthers" => {
            let id = str_param(params, "tabId")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"closed": a.tab_manager.close_other_tabs(id)}))
        }
        "tab.closeAll" => {
            let exclude_home = bool_param(params, "excludeHome", true);
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"closed": a.tab_manager.close_all_tabs(exclude_home)}))
        }
        "tab.activate" => {
            let id = str_param(params, "tabId")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.activate_tab(id)}))
        }
        "tab.minimize" => {
            let id = str_param(params, "tabId")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.minimize_tab(id)}))
        }
        "tab.restore" => {
            let id = str_param(params, "tabId")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.restore_tab(id)}))
        }
        "tab.maximize" => {
            let id = str_param(params, "tabId")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.maximize_tab(id)}))
        }
        "tab.restoreMaximized" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.restore_maximized()}))
        }
        "tab.togglePin" => {
            let id = str_param(params, "tabId")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.toggle_pin_tab(id)}))
        }
        "tab.reorder" => {
            let from = index_param(params, "fromIndex")?;
            let to = index_param(params, "toIndex")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.reorder_tabs(from, to)}))
        }
        "tab.updateState" => {
            let id = str_param(params, "tabId")?;
            let state: TabState = required_param(params, "state")?;
            let error = params.get("error").and_then(|v| v.as_str()).map(String::from);
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.tab_manager
                .update_tab_state(id, state, error)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.setUnsaved" => {
            let id = str_param(params, "tabId")?;
            let dirty = params
                .get("dirty")
                .and_then(|v| v.as_bool())
                .ok_or("missing dirty")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.tab_manager
                .set_unsaved_changes(id, dirty)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "tab.update" => {
            let id = str_param(params, "tabId")?;
            let patch: TabPatch = required_param(params, "patch")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.tab_manager.update_tab(id, patch).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Compare ───
        "compare.add" => {
            let id = str_param(params, "tabId")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.add_to_compare(id)}))
        }
        "compare.remove" => {
            let id = str_param(params, "tabId")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.remove_from_compare(id)}))
        }
        "compare.clear" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.clear_compare_mode()}))
        }
        "compare.setMode" => {
            let mode: CompareMode = required_param(params, "mode")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"ok": a.tab_manager.set_compare_mode(mode)}))
        }

        // ─── Config ───
        "config.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            to_json(a.tab_manager.config())
        }
        "config.set" => {
            let config: WorkspaceConfig = required_param(params, "config")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.update_config(config).map_err(|e| e.to_string())?;
            to_json(a.tab_manager.config())
        }

        // ─── Session ───
        "session.login" => {
            let identity: SessionIdentity =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid identity: {}", e))?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.login(identity);
            Ok(json!({"ok": true}))
        }
        "session.logout" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            a.logout();
            Ok(json!({"ok": true}))
        }
        "session.restore" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!({"restored": a.tab_manager.restore_session()}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
