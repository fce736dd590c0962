// Tabdesk state managers
// Managers own the workspace state and its persistence: the snapshot store,
// tab lifecycle, compare mode and session save/restore.

pub mod compare;
pub mod session_manager;
pub mod tab_manager;
pub mod workspace_store;
