use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tab::{ExclusivityMode, Tab, TabState};

/// Maximum number of tabs shown side by side in compare mode.
pub const MAX_COMPARE_TABS: usize = 4;

/// Behavioural switches for the workspace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceConfig {
    pub max_tabs: usize,
    pub allow_duplicates: bool,
    pub persist_tabs: bool,
    pub enable_sorting: bool,
    pub enable_minimize: bool,
    pub enable_maximize: bool,
    pub home_tab_closable: bool,
    pub tab_close_confirmation: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            max_tabs: 10,
            allow_duplicates: false,
            persist_tabs: true,
            enable_sorting: true,
            enable_minimize: true,
            enable_maximize: true,
            home_tab_closable: false,
            tab_close_confirmation: true,
        }
    }
}

/// Layout used while compare mode is on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CompareMode {
    #[default]
    None,
    SideBySide,
    Grid,
}

/// Immutable view of every open tab plus the derived selections.
///
/// `tabs` is kept sorted by `order`, so a tab's index is its order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub tabs: Vec<Tab>,
    pub active_tab_id: Option<String>,
    pub minimized_tab_ids: Vec<String>,
    pub maximized_tab_id: Option<String>,
    pub compare_tab_ids: Vec<String>,
    pub compare_mode: CompareMode,
    pub config: WorkspaceConfig,
}

impl Workspace {
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active_tab_id.as_deref().and_then(|id| self.tab(id))
    }

    pub fn maximized_tab(&self) -> Option<&Tab> {
        self.maximized_tab_id.as_deref().and_then(|id| self.tab(id))
    }

    /// Tabs not hidden in the minimized tray, in display order.
    pub fn visible_tabs(&self) -> Vec<&Tab> {
        self.tabs.iter().filter(|t| !t.is_minimized).collect()
    }

    pub fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub(crate) fn tab_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    /// Rewrites `order` to match each tab's index.
    pub(crate) fn renumber(&mut self) {
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.order = i;
        }
    }

    /// Makes `tab_id` the only active tab and pulls it out of the minimized tray.
    /// Returns false when the id is unknown.
    pub(crate) fn set_active(&mut self, tab_id: &str, now: DateTime<Utc>) -> bool {
        if self.position(tab_id).is_none() {
            return false;
        }
        for tab in self.tabs.iter_mut() {
            tab.is_active = tab.id == tab_id;
            if tab.is_active {
                tab.last_accessed_at = now;
                if tab.is_minimized {
                    tab.is_minimized = false;
                    if tab.state == TabState::Minimized {
                        tab.state = TabState::Idle;
                    }
                }
            }
        }
        self.minimized_tab_ids.retain(|id| id != tab_id);
        self.active_tab_id = Some(tab_id.to_string());
        true
    }

    /// Removes every tab matching `pred` along with its auxiliary selections,
    /// renumbers the survivors and repairs the active selection.
    ///
    /// When the active tab is removed, the nearest surviving tab before it
    /// becomes active, else the last surviving tab.
    pub(crate) fn remove_where<F>(&mut self, now: DateTime<Utc>, mut pred: F) -> Vec<Tab>
    where
        F: FnMut(&Tab) -> bool,
    {
        let active_pos = self
            .active_tab_id
            .as_deref()
            .and_then(|id| self.position(id));

        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.tabs.len());
        let mut survivors_before_active = 0usize;
        for (i, tab) in std::mem::take(&mut self.tabs).into_iter().enumerate() {
            if pred(&tab) {
                removed.push(tab);
            } else {
                if active_pos.is_some_and(|p| i < p) {
                    survivors_before_active += 1;
                }
                kept.push(tab);
            }
        }
        self.tabs = kept;

        if removed.is_empty() {
            return removed;
        }

        for tab in &removed {
            self.minimized_tab_ids.retain(|id| *id != tab.id);
            self.compare_tab_ids.retain(|id| *id != tab.id);
            if self.maximized_tab_id.as_deref() == Some(tab.id.as_str()) {
                self.maximized_tab_id = None;
            }
        }
        self.renumber();

        let active_removed = self
            .active_tab_id
            .as_deref()
            .is_some_and(|id| removed.iter().any(|t| t.id == id));
        if active_removed {
            self.active_tab_id = None;
            let next = if survivors_before_active > 0 {
                self.tabs.get(survivors_before_active - 1)
            } else {
                self.tabs.last()
            };
            if let Some(next_id) = next.map(|t| t.id.clone()) {
                self.set_active(&next_id, now);
            }
        }
        removed
    }

    /// Lists every broken invariant. An empty result means the snapshot is consistent.
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        match self.active_tab_id.as_deref() {
            None if !self.tabs.is_empty() => {
                problems.push("no active tab in a non-empty workspace".to_string())
            }
            Some(id) if self.tab(id).is_none() => {
                problems.push(format!("active tab {} is not open", id))
            }
            _ => {}
        }
        let active_flags = self.tabs.iter().filter(|t| t.is_active).count();
        if active_flags > 1 || (self.active_tab_id.is_some() && active_flags != 1) {
            problems.push(format!("{} tabs flagged active", active_flags));
        }

        for (i, tab) in self.tabs.iter().enumerate() {
            if tab.order != i {
                problems.push(format!("tab {} has order {} at index {}", tab.id, tab.order, i));
            }
        }

        if self.tabs.len() > self.config.max_tabs {
            problems.push(format!(
                "{} tabs exceed the limit of {}",
                self.tabs.len(),
                self.config.max_tabs
            ));
        }

        for id in &self.minimized_tab_ids {
            if self.tab(id).is_none() {
                problems.push(format!("minimized tab {} is not open", id));
            }
        }
        if let Some(id) = self.maximized_tab_id.as_deref() {
            if self.tab(id).is_none() {
                problems.push(format!("maximized tab {} is not open", id));
            }
        }

        if self.compare_tab_ids.len() > MAX_COMPARE_TABS {
            problems.push(format!("{} tabs in compare", self.compare_tab_ids.len()));
        }
        for id in &self.compare_tab_ids {
            match self.tab(id) {
                Some(tab) if !tab.is_comparable => {
                    problems.push(format!("compare tab {} is not comparable", id))
                }
                None => problems.push(format!("compare tab {} is not open", id)),
                _ => {}
            }
        }

        let mut ids: Vec<&str> = self.tabs.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() != self.tabs.len() {
            problems.push("duplicate tab ids".to_string());
        }

        if let Some(code) = self.forbidden_duplicate_task() {
            problems.push(format!("task {} is open more than once", code));
        }

        problems
    }

    /// Returns a task code that is open more than once although the config
    /// forbids it: any repeat without `allow_duplicates`, or a repeat involving
    /// an exclusive tab with it.
    pub(crate) fn forbidden_duplicate_task(&self) -> Option<&str> {
        let allow = self.config.allow_duplicates;
        self.tabs.iter().enumerate().find_map(|(i, tab)| {
            self.tabs[i + 1..]
                .iter()
                .any(|other| {
                    other.task_code == tab.task_code
                        && (!allow
                            || tab.exclusivity_mode != ExclusivityMode::None
                            || other.exclusivity_mode != ExclusivityMode::None)
                })
                .then_some(tab.task_code.as_str())
        })
    }
}
