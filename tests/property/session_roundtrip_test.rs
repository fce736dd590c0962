//! Property-based tests for session save-restore round-trip.
//!
//! Persisting a workspace and restoring it within the freshness window
//! reproduces the same tabs, active tab and minimized tray, through both the
//! in-memory medium and encrypted SQLite.

use proptest::prelude::*;

use tabdesk::managers::session_manager::{SessionManager, SessionManagerTrait};
use tabdesk::managers::tab_manager::{TabManager, TabManagerTrait};
use tabdesk::storage::{EncryptedStore, KeyValueStore, MemoryStore, SqliteStore};
use tabdesk::types::tab::{OpenTabOptions, TabState, TaskType};
use tabdesk::types::workspace::{Workspace, WorkspaceConfig};

#[derive(Debug, Clone)]
struct Blueprint {
    code: String,
    title: String,
    task_type: TaskType,
    pinned: bool,
    minimize: bool,
}

fn arb_blueprint() -> impl Strategy<Value = Blueprint> {
    (
        "[A-Z]{3}[0-9]{2}",
        "[A-Za-z0-9 ]{1,30}",
        prop_oneof![
            Just(TaskType::Form),
            Just(TaskType::Report),
            Just(TaskType::Dashboard),
            Just(TaskType::External),
        ],
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(code, title, task_type, pinned, minimize)| Blueprint {
            code,
            title,
            task_type,
            pinned,
            minimize,
        })
}

fn build(blueprints: &[Blueprint], active: usize) -> Workspace {
    let mut mgr = TabManager::new(WorkspaceConfig {
        max_tabs: 10,
        persist_tabs: false,
        ..WorkspaceConfig::default()
    });
    let mut ids = Vec::new();
    for blueprint in blueprints {
        let options = OpenTabOptions {
            task_type: blueprint.task_type,
            is_pinned: blueprint.pinned,
            ..OpenTabOptions::default()
        };
        if let Ok(tab) = mgr.open_tab(&blueprint.code, &blueprint.title, "/task", options) {
            if !ids.contains(&tab.id) {
                ids.push(tab.id);
            }
        }
    }
    if !ids.is_empty() {
        mgr.activate_tab(&ids[active % ids.len()]);
    }
    for (blueprint, id) in blueprints.iter().zip(ids.iter()) {
        if blueprint.minimize {
            mgr.minimize_tab(id);
        }
    }
    mgr.workspace().clone()
}

fn assert_equivalent(original: &Workspace, restored: &Workspace) -> Result<(), TestCaseError> {
    prop_assert_eq!(original.len(), restored.len());
    prop_assert_eq!(&original.active_tab_id, &restored.active_tab_id);
    prop_assert_eq!(&original.minimized_tab_ids, &restored.minimized_tab_ids);
    for (a, b) in original.tabs.iter().zip(restored.tabs.iter()) {
        prop_assert_eq!(&a.id, &b.id);
        prop_assert_eq!(&a.task_code, &b.task_code);
        prop_assert_eq!(&a.title, &b.title);
        prop_assert_eq!(a.order, b.order);
        prop_assert_eq!(a.is_pinned, b.is_pinned);
        prop_assert_eq!(a.is_active, b.is_active);
        prop_assert_eq!(a.is_minimized, b.is_minimized);
        prop_assert_eq!(a.exclusivity_mode, b.exclusivity_mode);
        prop_assert_eq!(a.created_at, b.created_at);
        let expected_state = if a.is_minimized { TabState::Minimized } else { TabState::Idle };
        prop_assert_eq!(b.state, expected_state);
    }
    prop_assert!(restored.invariant_violations().is_empty());
    Ok(())
}

fn roundtrip(store: Box<dyn KeyValueStore>, original: &Workspace) -> Result<(), TestCaseError> {
    let session = SessionManager::new(store);
    session.save_session(original).unwrap();
    let restored = session.restore_session(&original.config).unwrap();

    match restored {
        None => prop_assert!(original.is_empty()),
        Some(restored) => assert_equivalent(original, &restored)?,
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn memory_roundtrip_preserves_workspace(
        blueprints in prop::collection::vec(arb_blueprint(), 0..12),
        active in 0..12usize,
    ) {
        let original = build(&blueprints, active);
        roundtrip(Box::new(MemoryStore::new()), &original)?;
    }
}

// Key derivation dominates here, so fewer cases.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn encrypted_sqlite_roundtrip_preserves_workspace(
        blueprints in prop::collection::vec(arb_blueprint(), 1..6),
        active in 0..6usize,
    ) {
        let original = build(&blueprints, active);
        let store = EncryptedStore::new(SqliteStore::open_in_memory().unwrap(), "passphrase", b"salt").unwrap();
        roundtrip(Box::new(store), &original)?;
    }
}
