use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task code reserved for the permanent home tab.
pub const HOME_TASK_CODE: &str = "HOME";

/// Represents an open workspace tab embedding one business task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    pub task_code: String,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub url: String,
    pub task_type: TaskType,
    pub exclusivity_mode: ExclusivityMode,
    pub state: TabState,
    pub error: Option<String>,
    pub is_active: bool,
    pub is_pinned: bool,
    pub is_minimized: bool,
    pub is_maximized: bool,
    pub is_comparable: bool,
    pub is_closable: bool,
    pub has_unsaved_changes: bool,
    pub order: usize,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Tab {
    /// Whether this tab is the conventional home tab.
    pub fn is_home(&self) -> bool {
        self.task_code == HOME_TASK_CODE
    }
}

/// Kind of screen a tab embeds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskType {
    #[default]
    Form,
    Report,
    Dashboard,
    External,
}

impl TaskType {
    /// Reports and dashboards can be compared side by side; forms and external pages cannot.
    pub fn default_comparable(self) -> bool {
        matches!(self, TaskType::Report | TaskType::Dashboard)
    }

    /// Forms hold per-user edit state, so only one instance per user is allowed by default.
    pub fn default_exclusivity(self) -> ExclusivityMode {
        match self {
            TaskType::Form => ExclusivityMode::User,
            _ => ExclusivityMode::None,
        }
    }
}

/// Policy restricting concurrent instances of the same task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExclusivityMode {
    #[default]
    None,
    User,
    System,
}

/// Lifecycle tag reported by the embedding surface.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TabState {
    #[default]
    Loading,
    Loaded,
    Error,
    Saving,
    Saved,
    Minimized,
    Idle,
}

/// Caller-supplied options for opening a tab. Unset fields fall back to the
/// task type's defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenTabOptions {
    pub description: Option<String>,
    pub icon: Option<String>,
    pub task_type: TaskType,
    pub exclusivity_mode: Option<ExclusivityMode>,
    pub is_comparable: Option<bool>,
    pub is_closable: Option<bool>,
    pub is_pinned: bool,
    pub metadata: BTreeMap<String, String>,
}

/// Partial update of a tab's display metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TabPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}
