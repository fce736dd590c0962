//! Session persistence for the workspace.
//!
//! Saves the open tab set to a [`KeyValueStore`] under a fixed key and
//! restores it on startup. Restored snapshots older than the freshness window
//! are discarded, and everything that is restored is re-validated against the
//! current [`WorkspaceConfig`].

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::storage::KeyValueStore;
use crate::types::errors::SessionError;
use crate::types::session::SessionData;
use crate::types::settings::DEFAULT_STORAGE_KEY;
use crate::types::tab::{ExclusivityMode, TabState};
use crate::types::workspace::{Workspace, WorkspaceConfig};

/// Snapshots whose oldest tab is older than this are not restored.
pub const SESSION_MAX_AGE_HOURS: i64 = 24;

/// Session persistence operations.
pub trait SessionManagerTrait {
    fn save_session(&self, workspace: &Workspace) -> Result<(), SessionError>;
    fn restore_session(&self, config: &WorkspaceConfig) -> Result<Option<Workspace>, SessionError>;
    fn has_session(&self) -> bool;
    fn clear_session(&self) -> Result<(), SessionError>;
}

/// Session adapter over an injected storage medium.
pub struct SessionManager {
    store: Box<dyn KeyValueStore>,
    key: String,
    max_age: Duration,
}

impl SessionManager {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(store: Box<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
            max_age: Duration::hours(SESSION_MAX_AGE_HOURS),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Builds the payload written to storage. Transient per-load state is
    /// normalized to `Idle`; the embedding surface reloads each tab anyway.
    pub fn to_session_data(workspace: &Workspace) -> SessionData {
        let tabs = workspace
            .tabs
            .iter()
            .cloned()
            .map(|mut tab| {
                tab.state = TabState::Idle;
                tab.error = None;
                tab.is_maximized = false;
                tab
            })
            .collect();
        SessionData {
            tabs,
            active_tab_id: workspace.active_tab_id.clone(),
            minimized_tab_ids: workspace.minimized_tab_ids.clone(),
            timestamp: Utc::now(),
        }
    }

    /// Restores as of `now`. Split out so staleness can be tested without a clock.
    pub fn restore_session_at(
        &self,
        config: &WorkspaceConfig,
        now: DateTime<Utc>,
    ) -> Result<Option<Workspace>, SessionError> {
        let Some(raw) = self.store.get(&self.key)? else {
            debug!(key = %self.key, "no stored workspace");
            return Ok(None);
        };

        let data: SessionData = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding unreadable workspace snapshot");
                self.store.remove(&self.key)?;
                return Ok(None);
            }
        };

        if let Some(oldest) = data.earliest_created_at() {
            if now - oldest > self.max_age {
                info!(key = %self.key, created_at = %oldest, "discarding stale workspace snapshot");
                self.store.remove(&self.key)?;
                return Ok(None);
            }
        }

        Ok(rebuild(data, config))
    }
}

impl SessionManagerTrait for SessionManager {
    fn save_session(&self, workspace: &Workspace) -> Result<(), SessionError> {
        let json = serde_json::to_string(&Self::to_session_data(workspace))?;
        self.store.set(&self.key, &json)?;
        debug!(key = %self.key, tabs = workspace.len(), "workspace saved");
        Ok(())
    }

    fn restore_session(&self, config: &WorkspaceConfig) -> Result<Option<Workspace>, SessionError> {
        self.restore_session_at(config, Utc::now())
    }

    fn has_session(&self) -> bool {
        matches!(self.store.get(&self.key), Ok(Some(_)))
    }

    fn clear_session(&self) -> Result<(), SessionError> {
        self.store.remove(&self.key)?;
        Ok(())
    }
}

/// Turns a stored payload back into a consistent workspace, or `None` when
/// nothing usable survives.
fn rebuild(data: SessionData, config: &WorkspaceConfig) -> Option<Workspace> {
    let mut tabs = data.tabs;
    tabs.sort_by_key(|t| t.order);

    let mut seen_ids = HashSet::new();
    tabs.retain(|t| seen_ids.insert(t.id.clone()));
    // code -> whether any kept tab for it is exclusive
    let mut seen_codes: HashMap<String, bool> = HashMap::new();
    tabs.retain(|t| {
        let exclusive = t.exclusivity_mode != ExclusivityMode::None;
        match seen_codes.get(&t.task_code) {
            None => {
                seen_codes.insert(t.task_code.clone(), exclusive);
                true
            }
            Some(&any_exclusive) => config.allow_duplicates && !exclusive && !any_exclusive,
        }
    });
    tabs.truncate(config.max_tabs);
    if tabs.is_empty() {
        return None;
    }

    let open: HashSet<&str> = tabs.iter().map(|t| t.id.as_str()).collect();
    let mut minimized: Vec<String> = Vec::new();
    if config.enable_minimize {
        for id in data.minimized_tab_ids {
            if open.contains(id.as_str()) && !minimized.contains(&id) {
                minimized.push(id);
            }
        }
    }

    let active_id = data
        .active_tab_id
        .filter(|id| open.contains(id.as_str()))
        .or_else(|| tabs.last().map(|t| t.id.clone()))?;

    for tab in tabs.iter_mut() {
        tab.is_minimized = minimized.contains(&tab.id);
        tab.state = if tab.is_minimized {
            TabState::Minimized
        } else {
            TabState::Idle
        };
        tab.error = None;
        tab.is_maximized = false;
        tab.is_active = tab.id == active_id;
    }

    let mut workspace = Workspace::new(config.clone());
    workspace.tabs = tabs;
    workspace.minimized_tab_ids = minimized;
    workspace.active_tab_id = Some(active_id);
    workspace.renumber();
    Some(workspace)
}
