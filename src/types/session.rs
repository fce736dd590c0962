use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tab::Tab;

/// Workspace snapshot as written to the storage medium.
///
/// Only the main tab set is persisted; maximize and compare selections are
/// view state and start fresh after a reload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub tabs: Vec<Tab>,
    pub active_tab_id: Option<String>,
    #[serde(default)]
    pub minimized_tab_ids: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl SessionData {
    /// Creation time of the oldest tab, used to judge staleness.
    pub fn earliest_created_at(&self) -> Option<DateTime<Utc>> {
        self.tabs.iter().map(|t| t.created_at).min()
    }
}
