//! Tab lifecycle for the workspace.
//!
//! [`TabManager`] is the only mutation surface over the [`WorkspaceStore`].
//! Each operation commits atomically, then saves the session (best effort),
//! publishes lifecycle events and reports opens/closes to the audit logger.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::compare::{self, CompareModeTrait};
use super::session_manager::{SessionManager, SessionManagerTrait};
use super::workspace_store::WorkspaceStore;
use crate::services::identity::SessionIdentityProvider;
use crate::services::task_logger::{TaskAuditLogger, TracingTaskLogger};
use crate::types::errors::TabError;
use crate::types::event::{TabEvent, TabEventKind};
use crate::types::tab::{ExclusivityMode, OpenTabOptions, Tab, TabPatch, TabState, HOME_TASK_CODE};
use crate::types::task::{ActiveTask, TaskDescriptor, EXECUTION_CLOSE, EXECUTION_OPEN};
use crate::types::workspace::{CompareMode, Workspace, WorkspaceConfig};

/// Metadata keys stamped onto new tabs.
pub const META_SESSION_ID: &str = "sessionId";
pub const META_USER_NAME: &str = "userName";
pub const META_BUSINESS_UNIT: &str = "businessUnit";
pub const META_MENU_CODE: &str = "menuCode";
pub const META_APPLICATION_CODE: &str = "applicationCode";

/// Asked before a tab with unsaved changes is closed.
pub trait CloseConfirmer: Send {
    fn confirm_close(&self, tab: &Tab) -> bool;
}

/// Never closes a dirty tab without `force`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeclineUnsaved;

impl CloseConfirmer for DeclineUnsaved {
    fn confirm_close(&self, _tab: &Tab) -> bool {
        false
    }
}

impl<F> CloseConfirmer for F
where
    F: Fn(&Tab) -> bool + Send,
{
    fn confirm_close(&self, tab: &Tab) -> bool {
        self(tab)
    }
}

/// Workspace lifecycle operations.
pub trait TabManagerTrait {
    fn open_tab(
        &mut self,
        task_code: &str,
        title: &str,
        url: &str,
        options: OpenTabOptions,
    ) -> Result<Tab, TabError>;
    fn open_task(&mut self, task: &TaskDescriptor, options: OpenTabOptions) -> Result<Tab, TabError>;
    fn close_tab(&mut self, tab_id: &str, force: bool) -> Result<bool, TabError>;
    fn close_other_tabs(&mut self, keep_id: &str) -> usize;
    fn close_all_tabs(&mut self, exclude_home: bool) -> usize;
    fn activate_tab(&mut self, tab_id: &str) -> bool;
    fn minimize_tab(&mut self, tab_id: &str) -> bool;
    fn restore_tab(&mut self, tab_id: &str) -> bool;
    fn maximize_tab(&mut self, tab_id: &str) -> bool;
    fn restore_maximized(&mut self) -> bool;
    fn toggle_pin_tab(&mut self, tab_id: &str) -> bool;
    fn reorder_tabs(&mut self, from_index: usize, to_index: usize) -> bool;
    fn update_tab_state(
        &mut self,
        tab_id: &str,
        state: TabState,
        error: Option<String>,
    ) -> Result<(), TabError>;
    fn set_unsaved_changes(&mut self, tab_id: &str, dirty: bool) -> Result<(), TabError>;
    fn update_tab(&mut self, tab_id: &str, patch: TabPatch) -> Result<(), TabError>;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn get_all_tabs(&self) -> &[Tab];
    fn get_active_tab(&self) -> Option<&Tab>;
    fn tab_count(&self) -> usize;
}

pub struct TabManager {
    store: WorkspaceStore,
    session: Option<SessionManager>,
    audit: Box<dyn TaskAuditLogger>,
    identity: Option<Box<dyn SessionIdentityProvider>>,
    confirmer: Box<dyn CloseConfirmer>,
}

impl TabManager {
    /// A manager with no storage medium, log-only auditing and no identity.
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            store: WorkspaceStore::new(config),
            session: None,
            audit: Box::new(TracingTaskLogger),
            identity: None,
            confirmer: Box::new(DeclineUnsaved),
        }
    }

    pub fn with_session(mut self, session: SessionManager) -> Self {
        self.session = Some(session);
        self
    }

    pub fn with_audit_logger(mut self, audit: Box<dyn TaskAuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_identity(mut self, identity: Box<dyn SessionIdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_close_confirmer(mut self, confirmer: Box<dyn CloseConfirmer>) -> Self {
        self.confirmer = confirmer;
        self
    }

    pub fn snapshot(&self) -> Arc<Workspace> {
        self.store.snapshot()
    }

    pub fn workspace(&self) -> &Workspace {
        self.store.current()
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.store.current().config
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Workspace>> {
        self.store.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TabEvent> {
        self.store.subscribe_events()
    }

    pub fn minimized_tabs(&self) -> Vec<&Tab> {
        let ws = self.store.current();
        ws.minimized_tab_ids.iter().filter_map(|id| ws.tab(id)).collect()
    }

    pub fn maximized_tab(&self) -> Option<&Tab> {
        self.store.current().maximized_tab()
    }

    pub fn compare_tabs(&self) -> Vec<&Tab> {
        let ws = self.store.current();
        ws.compare_tab_ids.iter().filter_map(|id| ws.tab(id)).collect()
    }

    /// Replaces the workspace config. Rejected when the open tabs would
    /// violate it; disabling minimize or maximize releases those selections.
    pub fn set_config(&mut self, config: WorkspaceConfig) -> Result<(), TabError> {
        self.store.try_apply(|ws| {
            if config.max_tabs == 0 {
                return Err(TabError::InvalidConfig("maxTabs must be at least 1".to_string()));
            }
            if ws.len() > config.max_tabs {
                return Err(TabError::InvalidConfig(format!(
                    "maxTabs {} is below the {} open tabs",
                    config.max_tabs,
                    ws.len()
                )));
            }
            ws.config = config;
            if let Some(code) = ws.forbidden_duplicate_task() {
                return Err(TabError::InvalidConfig(format!(
                    "task {} is open more than once",
                    code
                )));
            }
            if !ws.config.enable_minimize {
                for id in std::mem::take(&mut ws.minimized_tab_ids) {
                    if let Some(tab) = ws.tab_mut(&id) {
                        tab.is_minimized = false;
                        tab.state = TabState::Idle;
                    }
                }
            }
            if !ws.config.enable_maximize {
                if let Some(id) = ws.maximized_tab_id.take() {
                    if let Some(tab) = ws.tab_mut(&id) {
                        tab.is_maximized = false;
                    }
                }
            }
            Ok(())
        })?;
        debug!("workspace config updated");
        self.persist();
        Ok(())
    }

    /// Loads the persisted workspace, replacing the current one. Returns the
    /// number of tabs restored; storage problems are logged and yield 0.
    pub fn restore_session(&mut self) -> usize {
        let config = self.config().clone();
        if !config.persist_tabs {
            debug!("tab persistence disabled, skipping restore");
            return 0;
        }
        let Some(session) = self.session.as_ref() else {
            return 0;
        };
        match session.restore_session(&config) {
            Ok(Some(workspace)) => {
                let restored = workspace.len();
                self.store.replace(workspace);
                info!(tabs = restored, "workspace restored");
                restored
            }
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "failed to restore workspace");
                0
            }
        }
    }

    /// Empties the workspace and forgets the persisted snapshot (logout).
    pub fn reset(&mut self) {
        let closed: Vec<Tab> = self.store.current().tabs.clone();
        let config = self.config().clone();
        self.store.replace(Workspace::new(config));
        if let Some(session) = self.session.as_ref() {
            if let Err(e) = session.clear_session() {
                warn!(error = %e, "failed to clear persisted workspace");
            }
        }
        info!(tabs = closed.len(), "workspace reset");
        self.store.emit(
            closed
                .into_iter()
                .map(|tab| TabEvent::new(TabEventKind::Closed, tab))
                .collect(),
        );
    }

    /// Best-effort save; the in-memory state stays authoritative on failure.
    fn persist(&self) {
        let ws = self.store.current();
        if !ws.config.persist_tabs {
            return;
        }
        if let Some(session) = self.session.as_ref() {
            if let Err(e) = session.save_session(ws) {
                warn!(error = %e, "failed to persist workspace");
            }
        }
    }

    fn finish(&self, events: Vec<TabEvent>) {
        self.persist();
        self.store.emit(events);
    }

    fn tab_event(&self, kind: TabEventKind, tab_id: &str) -> Option<TabEvent> {
        self.store
            .current()
            .tab(tab_id)
            .cloned()
            .map(|tab| TabEvent::new(kind, tab))
    }

    fn active_task(&self, tab: &Tab, execution_type: u8) -> Option<ActiveTask> {
        let identity = self.identity.as_ref()?.current()?;
        Some(ActiveTask {
            user_name: identity.user_name,
            business_unit: identity.business_unit,
            session_id: identity.session_id,
            task_code: tab.task_code.clone(),
            execution_type,
            exclusivity_mode: tab.exclusivity_mode,
            status_flag: u8::from(execution_type == EXECUTION_OPEN),
        })
    }

    /// Whether the unsaved-changes guard lets `tab` close.
    fn close_permitted(&self, tab: &Tab, force: bool) -> bool {
        if force || !tab.has_unsaved_changes || !self.config().tab_close_confirmation {
            return true;
        }
        self.confirmer.confirm_close(tab)
    }

    /// Removes the given tabs in one commit and runs the close side effects.
    fn close_ids(&mut self, ids: HashSet<String>) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let before_active = self.store.current().active_tab_id.clone();
        let now = Utc::now();
        let Some(removed) = self.store.apply(|ws| {
            let removed = ws.remove_where(now, |t| ids.contains(&t.id));
            (!removed.is_empty()).then_some(removed)
        }) else {
            return 0;
        };
        self.after_close(removed, before_active)
    }

    fn after_close(&self, removed: Vec<Tab>, before_active: Option<String>) -> usize {
        let count = removed.len();
        let mut events = Vec::with_capacity(count + 1);
        for tab in removed {
            info!(tab_id = %tab.id, task_code = %tab.task_code, "tab closed");
            if let Some(task) = self.active_task(&tab, EXECUTION_CLOSE) {
                self.audit.log_close(task);
            }
            events.push(TabEvent::new(TabEventKind::Closed, tab));
        }
        let after_active = self.store.current().active_tab_id.clone();
        if after_active != before_active {
            if let Some(id) = after_active {
                events.extend(self.tab_event(TabEventKind::Activated, &id));
            }
        }
        self.finish(events);
        count
    }

    fn build_tab(
        &self,
        task_code: &str,
        title: &str,
        url: &str,
        options: OpenTabOptions,
        order: usize,
    ) -> Tab {
        let now = Utc::now();
        let config = self.config();
        let mut metadata = options.metadata;
        if let Some(identity) = self.identity.as_ref().and_then(|p| p.current()) {
            metadata.entry(META_SESSION_ID.to_string()).or_insert(identity.session_id);
            metadata.entry(META_USER_NAME.to_string()).or_insert(identity.user_name);
            metadata
                .entry(META_BUSINESS_UNIT.to_string())
                .or_insert(identity.business_unit);
        }
        let is_closable = options.is_closable.unwrap_or(if task_code == HOME_TASK_CODE {
            config.home_tab_closable
        } else {
            true
        });

        Tab {
            id: Uuid::new_v4().to_string(),
            task_code: task_code.to_string(),
            title: title.to_string(),
            description: options.description,
            icon: options.icon,
            url: url.to_string(),
            task_type: options.task_type,
            exclusivity_mode: options
                .exclusivity_mode
                .unwrap_or_else(|| options.task_type.default_exclusivity()),
            state: TabState::Loading,
            error: None,
            is_active: false,
            is_pinned: options.is_pinned,
            is_minimized: false,
            is_maximized: false,
            is_comparable: options
                .is_comparable
                .unwrap_or_else(|| options.task_type.default_comparable()),
            is_closable,
            has_unsaved_changes: false,
            order,
            created_at: now,
            last_accessed_at: now,
            metadata,
        }
    }

    /// Emits `Updated` for every tab in `previous` or the current compare selection.
    fn emit_compare_updates(&self, previous: Vec<String>) {
        let mut ids = previous;
        for id in &self.store.current().compare_tab_ids {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        let events = ids
            .iter()
            .filter_map(|id| self.tab_event(TabEventKind::Updated, id))
            .collect();
        self.store.emit(events);
    }

    /// Applies `f` to one tab and emits `Updated`. Unknown ids are `NotFound`.
    fn update_one<F>(&mut self, tab_id: &str, f: F) -> Result<(), TabError>
    where
        F: FnOnce(&mut Tab),
    {
        self.store.try_apply(|ws| {
            let tab = ws
                .tab_mut(tab_id)
                .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
            f(tab);
            Ok(())
        })?;
        debug!(tab_id = %tab_id, "tab updated");
        let events = self.tab_event(TabEventKind::Updated, tab_id).into_iter().collect();
        self.finish(events);
        Ok(())
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}

enum Opened {
    New(String),
    Existing(String),
}

impl TabManagerTrait for TabManager {
    /// Opens a task in a new tab, or activates the tab already showing it.
    ///
    /// An existing tab for the same task is reused when duplicates are
    /// disallowed, or when either tab is exclusive. Otherwise a full
    /// workspace rejects the open; nothing is evicted.
    fn open_tab(
        &mut self,
        task_code: &str,
        title: &str,
        url: &str,
        options: OpenTabOptions,
    ) -> Result<Tab, TabError> {
        let requested_mode = options
            .exclusivity_mode
            .unwrap_or_else(|| options.task_type.default_exclusivity());
        let candidate = self.build_tab(task_code, title, url, options, self.tab_count());
        let now = Utc::now();

        let outcome = self.store.try_apply(|ws| {
            let allow_duplicates = ws.config.allow_duplicates;
            let existing = ws
                .tabs
                .iter()
                .find(|t| {
                    t.task_code == task_code
                        && (!allow_duplicates
                            || t.exclusivity_mode != ExclusivityMode::None
                            || requested_mode != ExclusivityMode::None)
                })
                .map(|t| t.id.clone());
            if let Some(id) = existing {
                ws.set_active(&id, now);
                return Ok(Opened::Existing(id));
            }

            if ws.len() >= ws.config.max_tabs {
                return Err(TabError::CapacityExceeded {
                    max: ws.config.max_tabs,
                });
            }

            let id = candidate.id.clone();
            let mut tab = candidate;
            tab.order = ws.len();
            ws.tabs.push(tab);
            ws.set_active(&id, now);
            Ok(Opened::New(id))
        });

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(task_code = %task_code, error = %e, "open rejected");
                return Err(e);
            }
        };

        let (id, kind) = match outcome {
            Opened::Existing(id) => {
                debug!(tab_id = %id, task_code = %task_code, "task already open, activating");
                (id, TabEventKind::Activated)
            }
            Opened::New(id) => {
                info!(tab_id = %id, task_code = %task_code, "tab opened");
                (id, TabEventKind::Opened)
            }
        };
        let tab = self
            .get_tab(&id)
            .cloned()
            .ok_or_else(|| TabError::NotFound(id.clone()))?;
        if kind == TabEventKind::Opened {
            if let Some(task) = self.active_task(&tab, EXECUTION_OPEN) {
                self.audit.log_open(task);
            }
        }
        self.finish(vec![TabEvent::new(kind, tab.clone())]);
        Ok(tab)
    }

    /// Opens a task described by the menu service.
    fn open_task(&mut self, task: &TaskDescriptor, mut options: OpenTabOptions) -> Result<Tab, TabError> {
        if options.icon.is_none() {
            options.icon = task.icon.clone();
        }
        if options.description.is_none() {
            options.description = task.description.clone();
        }
        if let Some(menu_code) = &task.menu_code {
            options
                .metadata
                .insert(META_MENU_CODE.to_string(), menu_code.clone());
        }
        if let Some(app_code) = &task.application_code {
            options
                .metadata
                .insert(META_APPLICATION_CODE.to_string(), app_code.clone());
        }
        self.open_tab(&task.task_code, &task.caption, &task.url, options)
    }

    /// Closes one tab. `Ok(false)` when the id is unknown or the user declined
    /// to discard unsaved changes.
    fn close_tab(&mut self, tab_id: &str, force: bool) -> Result<bool, TabError> {
        let Some(tab) = self.get_tab(tab_id).cloned() else {
            return Ok(false);
        };
        if !tab.is_closable {
            warn!(tab_id = %tab_id, "close rejected: tab is not closable");
            return Err(TabError::NotClosable(tab_id.to_string()));
        }
        if !self.close_permitted(&tab, force) {
            debug!(tab_id = %tab_id, "close declined: unsaved changes");
            return Ok(false);
        }
        Ok(self.close_ids(HashSet::from([tab.id])) == 1)
    }

    /// Closes every closable, unpinned tab except `keep_id`, which becomes active.
    fn close_other_tabs(&mut self, keep_id: &str) -> usize {
        if self.get_tab(keep_id).is_none() {
            return 0;
        }
        let ids: HashSet<String> = self
            .get_all_tabs()
            .iter()
            .filter(|t| t.id != keep_id && t.is_closable && !t.is_pinned)
            .filter(|t| self.close_permitted(t, false))
            .map(|t| t.id.clone())
            .collect();

        let before_active = self.store.current().active_tab_id.clone();
        let now = Utc::now();
        let removed = self
            .store
            .apply(|ws| {
                let removed = ws.remove_where(now, |t| ids.contains(&t.id));
                let activate = ws.active_tab_id.as_deref() != Some(keep_id);
                if activate {
                    ws.set_active(keep_id, now);
                }
                (activate || !removed.is_empty()).then_some(removed)
            })
            .unwrap_or_default();
        self.after_close(removed, before_active)
    }

    /// Closes every closable, unpinned tab. With `exclude_home` the home tab
    /// survives even when it is closable.
    fn close_all_tabs(&mut self, exclude_home: bool) -> usize {
        let ids: HashSet<String> = self
            .get_all_tabs()
            .iter()
            .filter(|t| t.is_closable && !t.is_pinned && !(exclude_home && t.is_home()))
            .filter(|t| self.close_permitted(t, false))
            .map(|t| t.id.clone())
            .collect();
        self.close_ids(ids)
    }

    fn activate_tab(&mut self, tab_id: &str) -> bool {
        let now = Utc::now();
        if self.store.apply(|ws| ws.set_active(tab_id, now).then_some(())).is_none() {
            return false;
        }
        debug!(tab_id = %tab_id, "tab activated");
        let events = self.tab_event(TabEventKind::Activated, tab_id).into_iter().collect();
        self.finish(events);
        true
    }

    /// Hides a tab in the minimized tray. A minimized active tab hands focus
    /// to the nearest visible tab, if there is one.
    fn minimize_tab(&mut self, tab_id: &str) -> bool {
        if !self.config().enable_minimize {
            return false;
        }
        let now = Utc::now();
        let committed = self.store.apply(|ws| {
            let pos = ws.position(tab_id)?;
            if ws.tabs[pos].is_minimized {
                return None;
            }
            let tab = &mut ws.tabs[pos];
            tab.is_minimized = true;
            tab.state = TabState::Minimized;
            ws.minimized_tab_ids.push(tab_id.to_string());

            let mut handoff = None;
            if ws.active_tab_id.as_deref() == Some(tab_id) {
                let visible = |t: &&Tab| !t.is_minimized;
                handoff = ws.tabs[..pos]
                    .iter()
                    .rev()
                    .find(visible)
                    .or_else(|| ws.tabs[pos + 1..].iter().find(visible))
                    .map(|t| t.id.clone());
                if let Some(next) = handoff.as_deref() {
                    ws.set_active(next, now);
                }
            }
            Some(handoff)
        });
        let Some(handoff) = committed else {
            return false;
        };
        debug!(tab_id = %tab_id, "tab minimized");
        let mut events: Vec<TabEvent> =
            self.tab_event(TabEventKind::Minimized, tab_id).into_iter().collect();
        if let Some(next) = handoff {
            events.extend(self.tab_event(TabEventKind::Activated, &next));
        }
        self.finish(events);
        true
    }

    /// Brings a minimized tab back and activates it.
    fn restore_tab(&mut self, tab_id: &str) -> bool {
        if !self.config().enable_minimize {
            return false;
        }
        if !self.get_tab(tab_id).is_some_and(|t| t.is_minimized) {
            return false;
        }
        self.activate_tab(tab_id)
    }

    fn maximize_tab(&mut self, tab_id: &str) -> bool {
        if !self.config().enable_maximize {
            return false;
        }
        let committed = self.store.apply(|ws| {
            if ws.tab(tab_id).is_none() || ws.maximized_tab_id.as_deref() == Some(tab_id) {
                return None;
            }
            for tab in ws.tabs.iter_mut() {
                tab.is_maximized = tab.id == tab_id;
            }
            ws.maximized_tab_id = Some(tab_id.to_string());
            Some(())
        });
        if committed.is_none() {
            return false;
        }
        debug!(tab_id = %tab_id, "tab maximized");
        let events = self.tab_event(TabEventKind::Maximized, tab_id).into_iter().collect();
        self.finish(events);
        true
    }

    fn restore_maximized(&mut self) -> bool {
        if !self.config().enable_maximize {
            return false;
        }
        let released = self.store.apply(|ws| {
            let id = ws.maximized_tab_id.take()?;
            if let Some(tab) = ws.tab_mut(&id) {
                tab.is_maximized = false;
            }
            Some(id)
        });
        let Some(id) = released else {
            return false;
        };
        debug!(tab_id = %id, "tab restored from maximized");
        let events = self.tab_event(TabEventKind::Updated, &id).into_iter().collect();
        self.finish(events);
        true
    }

    fn toggle_pin_tab(&mut self, tab_id: &str) -> bool {
        let pinned = self.store.apply(|ws| {
            let tab = ws.tab_mut(tab_id)?;
            tab.is_pinned = !tab.is_pinned;
            Some(tab.is_pinned)
        });
        let Some(pinned) = pinned else {
            return false;
        };
        debug!(tab_id = %tab_id, pinned, "tab pin toggled");
        let events = self.tab_event(TabEventKind::Updated, tab_id).into_iter().collect();
        self.finish(events);
        true
    }

    /// Moves the tab at `from_index` to `to_index`, shifting the tabs between.
    fn reorder_tabs(&mut self, from_index: usize, to_index: usize) -> bool {
        if !self.config().enable_sorting {
            return false;
        }
        let moved = self.store.apply(|ws| {
            let len = ws.len();
            if from_index >= len || to_index >= len || from_index == to_index {
                return None;
            }
            let tab = ws.tabs.remove(from_index);
            let id = tab.id.clone();
            ws.tabs.insert(to_index, tab);
            ws.renumber();
            Some(id)
        });
        let Some(id) = moved else {
            return false;
        };
        debug!(tab_id = %id, from_index, to_index, "tabs reordered");
        let events = self.tab_event(TabEventKind::Sorted, &id).into_iter().collect();
        self.finish(events);
        true
    }

    /// Records load progress reported by the embedding surface. `error` is
    /// kept only for the `Error` state; `Saved` clears the dirty flag.
    ///
    /// `Minimized` follows tray membership: it cannot be reported here, and a
    /// tab in the tray keeps it until restored.
    fn update_tab_state(
        &mut self,
        tab_id: &str,
        state: TabState,
        error: Option<String>,
    ) -> Result<(), TabError> {
        if state == TabState::Minimized {
            return Err(TabError::InvalidState(
                "MINIMIZED is set by minimizing the tab".to_string(),
            ));
        }
        self.update_one(tab_id, |tab| {
            if !tab.is_minimized {
                tab.state = state;
            }
            tab.error = if state == TabState::Error { error } else { None };
            if state == TabState::Saved {
                tab.has_unsaved_changes = false;
            }
        })
    }

    fn set_unsaved_changes(&mut self, tab_id: &str, dirty: bool) -> Result<(), TabError> {
        self.update_one(tab_id, |tab| tab.has_unsaved_changes = dirty)
    }

    fn update_tab(&mut self, tab_id: &str, patch: TabPatch) -> Result<(), TabError> {
        self.update_one(tab_id, |tab| {
            if let Some(title) = patch.title {
                tab.title = title;
            }
            if let Some(url) = patch.url {
                tab.url = url;
            }
            if patch.icon.is_some() {
                tab.icon = patch.icon;
            }
            if patch.description.is_some() {
                tab.description = patch.description;
            }
        })
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.store.current().tab(tab_id)
    }

    fn get_all_tabs(&self) -> &[Tab] {
        &self.store.current().tabs
    }

    fn get_active_tab(&self) -> Option<&Tab> {
        self.store.current().active_tab()
    }

    fn tab_count(&self) -> usize {
        self.store.current().len()
    }
}

impl CompareModeTrait for TabManager {
    /// Adds a comparable tab; a full selection drops its earliest entry.
    fn add_to_compare(&mut self, tab_id: &str) -> bool {
        let Some(evicted) = self.store.apply(|ws| compare::add(ws, tab_id)) else {
            return false;
        };
        if let Some(old) = evicted {
            debug!(tab_id = %tab_id, evicted = %old, "compare window full, evicted oldest");
        } else {
            debug!(tab_id = %tab_id, "added to compare");
        }
        let events = self.tab_event(TabEventKind::Updated, tab_id).into_iter().collect();
        self.store.emit(events);
        true
    }

    fn remove_from_compare(&mut self, tab_id: &str) -> bool {
        if self.store.apply(|ws| compare::remove(ws, tab_id).then_some(())).is_none() {
            return false;
        }
        debug!(tab_id = %tab_id, "removed from compare");
        let events = self.tab_event(TabEventKind::Updated, tab_id).into_iter().collect();
        self.store.emit(events);
        true
    }

    fn set_compare_mode(&mut self, mode: CompareMode) -> bool {
        let selected = self.store.current().compare_tab_ids.clone();
        if self
            .store
            .apply(|ws| compare::set_mode(ws, mode).then_some(()))
            .is_none()
        {
            return false;
        }
        debug!(?mode, "compare mode set");
        self.emit_compare_updates(selected);
        true
    }

    fn clear_compare_mode(&mut self) -> bool {
        let selected = self.store.current().compare_tab_ids.clone();
        if self.store.apply(|ws| compare::clear(ws).then_some(())).is_none() {
            return false;
        }
        debug!("compare mode cleared");
        self.emit_compare_updates(selected);
        true
    }
}
