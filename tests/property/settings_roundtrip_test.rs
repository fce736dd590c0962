//! Property-based tests for ShellSettings serialization round-trip.
//!
//! Arbitrary valid settings survive JSON serialization and a save/load cycle
//! through the SettingsEngine without data loss.

use proptest::prelude::*;
use tempfile::TempDir;

use tabdesk::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use tabdesk::types::settings::{
    AuditSettings, LoggingSettings, ShellSettings, StorageBackend, StorageSettings,
};
use tabdesk::types::workspace::WorkspaceConfig;

fn arb_workspace_config() -> impl Strategy<Value = WorkspaceConfig> {
    (1..100usize, prop::array::uniform7(any::<bool>())).prop_map(|(max_tabs, flags)| {
        WorkspaceConfig {
            max_tabs,
            allow_duplicates: flags[0],
            persist_tabs: flags[1],
            enable_sorting: flags[2],
            enable_minimize: flags[3],
            enable_maximize: flags[4],
            home_tab_closable: flags[5],
            tab_close_confirmation: flags[6],
        }
    })
}

fn arb_storage() -> impl Strategy<Value = StorageSettings> {
    (
        prop_oneof![Just(StorageBackend::Memory), Just(StorageBackend::Sqlite)],
        prop::option::of("/[a-z]{1,10}/[a-z]{1,10}\\.db"),
        any::<bool>(),
        "[a-z][a-z.]{0,30}",
    )
        .prop_map(|(backend, path, encrypt, key)| StorageSettings {
            backend,
            path,
            encrypt,
            key,
        })
}

fn arb_settings() -> impl Strategy<Value = ShellSettings> {
    (
        arb_workspace_config(),
        arb_storage(),
        prop::option::of("https?://[a-z]{3,12}\\.[a-z]{2,4}(/[a-z]{1,8})?"),
        prop_oneof![
            Just("info".to_string()),
            Just("debug".to_string()),
            Just("tabdesk=trace,warn".to_string()),
        ],
    )
        .prop_map(|(workspace, storage, endpoint, filter)| ShellSettings {
            workspace,
            storage,
            audit: AuditSettings { endpoint },
            logging: LoggingSettings { filter },
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn settings_json_roundtrip(settings in arb_settings()) {
        let json = serde_json::to_string(&settings).unwrap();
        let back: ShellSettings = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, settings);
    }

    #[test]
    fn settings_save_load_roundtrip(settings in arb_settings()) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json").to_string_lossy().to_string();
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();

        let mut engine = SettingsEngine::new(Some(path.clone()));
        let loaded = engine.load().unwrap();
        prop_assert_eq!(&loaded, &settings);

        engine.save().unwrap();
        let mut reloaded = SettingsEngine::new(Some(path));
        prop_assert_eq!(reloaded.load().unwrap(), settings);
    }
}
