//! Compare-mode coordinator.
//!
//! Compare mode shows up to [`MAX_COMPARE_TABS`] comparable tabs side by side.
//! The selection is a rolling window: adding to a full selection evicts the
//! earliest-added entry instead of refusing.

use crate::types::workspace::{CompareMode, Workspace, MAX_COMPARE_TABS};

/// Compare-mode operations exposed by the tab manager.
pub trait CompareModeTrait {
    fn add_to_compare(&mut self, tab_id: &str) -> bool;
    fn remove_from_compare(&mut self, tab_id: &str) -> bool;
    fn set_compare_mode(&mut self, mode: CompareMode) -> bool;
    fn clear_compare_mode(&mut self) -> bool;
}

/// Appends `tab_id` to the selection. Returns the evicted id, if any, or
/// `None` when nothing changed because the tab is unknown, not comparable or
/// already selected.
pub(crate) fn add(workspace: &mut Workspace, tab_id: &str) -> Option<Option<String>> {
    let comparable = workspace.tab(tab_id).is_some_and(|t| t.is_comparable);
    if !comparable || workspace.compare_tab_ids.iter().any(|id| id == tab_id) {
        return None;
    }

    let evicted = if workspace.compare_tab_ids.len() >= MAX_COMPARE_TABS {
        Some(workspace.compare_tab_ids.remove(0))
    } else {
        None
    };
    workspace.compare_tab_ids.push(tab_id.to_string());
    if workspace.compare_mode == CompareMode::None {
        workspace.compare_mode = CompareMode::SideBySide;
    }
    Some(evicted)
}

pub(crate) fn remove(workspace: &mut Workspace, tab_id: &str) -> bool {
    let before = workspace.compare_tab_ids.len();
    workspace.compare_tab_ids.retain(|id| id != tab_id);
    workspace.compare_tab_ids.len() != before
}

pub(crate) fn set_mode(workspace: &mut Workspace, mode: CompareMode) -> bool {
    if workspace.compare_mode == mode {
        return false;
    }
    if mode == CompareMode::None {
        return clear(workspace);
    }
    workspace.compare_mode = mode;
    true
}

pub(crate) fn clear(workspace: &mut Workspace) -> bool {
    if workspace.compare_mode == CompareMode::None && workspace.compare_tab_ids.is_empty() {
        return false;
    }
    workspace.compare_mode = CompareMode::None;
    workspace.compare_tab_ids.clear();
    true
}
