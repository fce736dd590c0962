use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tab::Tab;

/// Kind of lifecycle transition reported to the host shell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TabEventKind {
    Opened,
    Closed,
    Activated,
    Minimized,
    Maximized,
    Updated,
    Sorted,
}

/// A lifecycle event carrying the tab as it looked after the transition
/// (or just before removal, for `Closed`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabEvent {
    #[serde(rename = "type")]
    pub kind: TabEventKind,
    pub tab: Tab,
    pub timestamp: DateTime<Utc>,
}

impl TabEvent {
    pub fn new(kind: TabEventKind, tab: Tab) -> Self {
        Self {
            kind,
            tab,
            timestamp: Utc::now(),
        }
    }
}
