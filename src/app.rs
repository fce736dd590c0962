//! App Core for tabdesk.
//!
//! Wires settings, the storage medium, the audit logger and the session
//! identity into one [`TabManager`] for the host shell.

use std::error::Error;
use std::path::PathBuf;

use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::managers::session_manager::SessionManager;
use crate::managers::tab_manager::TabManager;
use crate::platform;
use crate::services::identity::SharedIdentity;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::task_logger::{HttpTaskLogger, TaskAuditLogger, TracingTaskLogger};
use crate::storage::{EncryptedStore, KeyValueStore, MemoryStore, SqliteStore};
use crate::types::settings::{ShellSettings, StorageBackend};
use crate::types::task::SessionIdentity;
use crate::types::workspace::WorkspaceConfig;

/// Passphrase for `storage.encrypt`. Required when encryption is on.
pub const STORAGE_PASSPHRASE_ENV: &str = "TABDESK_STORAGE_PASSPHRASE";

const STORAGE_SALT: &[u8] = b"tabdesk-session";

/// Central struct holding the engine and its collaborators.
pub struct App {
    pub settings_engine: SettingsEngine,
    pub tab_manager: TabManager,
    pub identity: SharedIdentity,
}

impl App {
    /// Loads settings from `settings_path` (or the default location) and builds the engine.
    pub fn new(settings_path: Option<String>) -> Result<Self, Box<dyn Error>> {
        let mut settings_engine = SettingsEngine::new(settings_path);
        settings_engine.load()?;
        Self::open(settings_engine)
    }

    /// Builds the engine from already loaded settings, opening the configured store.
    pub fn open(settings_engine: SettingsEngine) -> Result<Self, Box<dyn Error>> {
        let store = open_store(settings_engine.get_settings())?;
        Ok(Self::assemble(settings_engine, store))
    }

    /// Builds the engine over an explicit storage medium.
    pub fn assemble(settings_engine: SettingsEngine, store: Box<dyn KeyValueStore>) -> Self {
        let settings = settings_engine.get_settings().clone();
        let identity = SharedIdentity::new();
        let session = SessionManager::with_key(store, &settings.storage.key);

        let tab_manager = TabManager::new(settings.workspace.clone())
            .with_session(session)
            .with_audit_logger(audit_logger(&settings))
            .with_identity(Box::new(identity.clone()));

        Self {
            settings_engine,
            tab_manager,
            identity,
        }
    }

    /// Startup sequence: restore the previous workspace. Returns the tab count restored.
    pub fn startup(&mut self) -> usize {
        let restored = self.tab_manager.restore_session();
        info!(restored, "tabdesk started");
        restored
    }

    pub fn login(&mut self, identity: SessionIdentity) {
        info!(user = %identity.user_name, "session signed in");
        self.identity.sign_in(identity);
    }

    /// Logout: drop every tab and the persisted snapshot, then forget the user.
    pub fn logout(&mut self) {
        self.tab_manager.reset();
        self.identity.sign_out();
        info!("session signed out");
    }

    /// Applies a new workspace config to the engine and saves it to settings.
    pub fn update_config(&mut self, config: WorkspaceConfig) -> Result<(), Box<dyn Error>> {
        self.tab_manager.set_config(config.clone())?;
        if let Err(e) = self.settings_engine.set_workspace_config(config) {
            warn!(error = %e, "workspace config applied but not saved");
        }
        Ok(())
    }
}

fn open_store(settings: &ShellSettings) -> Result<Box<dyn KeyValueStore>, Box<dyn Error>> {
    let storage = &settings.storage;
    let base: Box<dyn KeyValueStore> = match storage.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::Sqlite => {
            let path: PathBuf = storage
                .path
                .clone()
                .map(PathBuf::from)
                .unwrap_or_else(|| platform::get_data_dir().join("workspace.db"));
            info!(path = %path.display(), "opening workspace store");
            Box::new(SqliteStore::open(path)?)
        }
    };
    if !storage.encrypt {
        return Ok(base);
    }
    let passphrase = std::env::var(STORAGE_PASSPHRASE_ENV)
        .map_err(|_| format!("storage.encrypt is on but {} is not set", STORAGE_PASSPHRASE_ENV))?;
    Ok(Box::new(EncryptedStore::new(base, &passphrase, STORAGE_SALT)?))
}

fn audit_logger(settings: &ShellSettings) -> Box<dyn TaskAuditLogger> {
    let Some(endpoint) = settings.audit.endpoint.as_deref() else {
        return Box::new(TracingTaskLogger);
    };
    match Handle::try_current() {
        Ok(handle) => Box::new(HttpTaskLogger::new(endpoint, handle)),
        Err(_) => {
            warn!(endpoint, "no async runtime for audit requests, logging audit records only");
            Box::new(TracingTaskLogger)
        }
    }
}
