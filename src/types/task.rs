use serde::{Deserialize, Serialize};

use super::tab::ExclusivityMode;

/// Task metadata as supplied by the menu service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDescriptor {
    pub task_code: String,
    pub caption: String,
    pub url: String,
    pub icon: Option<String>,
    pub menu_code: Option<String>,
    pub application_code: Option<String>,
    pub description: Option<String>,
}

/// Who is signed in, as reported by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub session_id: String,
    pub user_name: String,
    pub business_unit: String,
}

/// Execution type sent to the audit service when a task opens.
pub const EXECUTION_OPEN: u8 = 0;
/// Execution type sent to the audit service when a task closes.
pub const EXECUTION_CLOSE: u8 = 1;

/// Audit record for a task open/close.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTask {
    pub user_name: String,
    pub business_unit: String,
    pub session_id: String,
    pub task_code: String,
    pub execution_type: u8,
    pub exclusivity_mode: ExclusivityMode,
    pub status_flag: u8,
}
