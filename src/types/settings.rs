use serde::{Deserialize, Serialize};

use super::workspace::WorkspaceConfig;

/// Storage key the workspace snapshot lives under unless overridden.
pub const DEFAULT_STORAGE_KEY: &str = "tabdesk.workspace.session";

/// Top-level shell settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ShellSettings {
    pub workspace: WorkspaceConfig,
    pub storage: StorageSettings,
    pub audit: AuditSettings,
    pub logging: LoggingSettings,
}

/// Which storage medium backs the workspace snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Lives as long as the process, like a browser's session storage.
    #[default]
    Memory,
    /// SQLite file under the data directory.
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// SQLite file path; defaults to `<data_dir>/workspace.db`.
    pub path: Option<String>,
    pub encrypt: bool,
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: None,
            encrypt: false,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Task audit service settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AuditSettings {
    /// Base URL of the audit endpoint. When unset, audit records are only logged.
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}
