// Tabdesk Settings Engine
// Loads shell settings (workspace config, storage, audit, logging) from a JSON file,
// updates individual values by dot path, and resets to defaults.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::ShellSettings;
use crate::types::workspace::WorkspaceConfig;

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "TABDESK_CONFIG";

/// Settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<ShellSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &ShellSettings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn set_workspace_config(&mut self, config: WorkspaceConfig) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings persisted as pretty JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: ShellSettings,
}

impl SettingsEngine {
    /// Path resolution order: `path_override`, `$TABDESK_CONFIG`, then
    /// `settings.json` in the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| {
                platform::get_config_dir()
                    .join("settings.json")
                    .to_string_lossy()
                    .to_string()
            });

        Self {
            config_path,
            settings: ShellSettings::default(),
        }
    }

    fn validate(settings: &ShellSettings) -> Result<(), SettingsError> {
        if settings.workspace.max_tabs == 0 {
            return Err(SettingsError::InvalidValue(
                "workspace.maxTabs must be at least 1".to_string(),
            ));
        }
        if settings.storage.key.is_empty() {
            return Err(SettingsError::InvalidValue(
                "storage.key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file yields defaults; a malformed or invalid file is an error.
    fn load(&mut self) -> Result<ShellSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!(path = %self.config_path, "no settings file, using defaults");
            self.settings = ShellSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;
        let settings: ShellSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Self::validate(&settings)?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &ShellSettings {
        &self.settings
    }

    /// Updates one value by its serialized dot path and saves.
    ///
    /// # Examples
    /// - `"workspace.maxTabs"` → `settings.workspace.max_tabs`
    /// - `"storage.backend"` → `settings.storage.backend`
    /// - `"logging.filter"` → `settings.logging.filter`
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        let parts: Vec<&str> = key.split('.').collect();
        if key.is_empty() || parts.iter().any(|p| p.is_empty()) {
            return Err(SettingsError::InvalidKey(format!("Malformed key '{}'", key)));
        }

        let mut tree = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let (leaf, parents) = parts
            .split_last()
            .ok_or_else(|| SettingsError::InvalidKey(key.to_string()))?;
        let mut node = &mut tree;
        for part in parents {
            node = node
                .get_mut(*part)
                .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found", key)))?;
        }
        match node {
            Value::Object(map) if map.contains_key(*leaf) => {
                map.insert(leaf.to_string(), value);
            }
            Value::Object(_) => {
                return Err(SettingsError::InvalidKey(format!("Key '{}' not found", key)));
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' does not address an object field",
                    key
                )));
            }
        }

        let updated: ShellSettings = serde_json::from_value(tree).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;
        Self::validate(&updated)?;

        self.settings = updated;
        self.save()
    }

    fn set_workspace_config(&mut self, config: WorkspaceConfig) -> Result<(), SettingsError> {
        let mut updated = self.settings.clone();
        updated.workspace = config;
        Self::validate(&updated)?;
        self.settings = updated;
        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = ShellSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
