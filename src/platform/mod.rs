// Tabdesk platform paths
// Config and data directories per OS, selected at compile time.
//
// Linux:   $XDG_CONFIG_HOME/tabdesk, $XDG_DATA_HOME/tabdesk (XDG defaults otherwise)
// macOS:   ~/Library/Application Support/Tabdesk
// Windows: %APPDATA%/Tabdesk

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the data directory (SQLite store location).
pub const DATA_DIR_ENV: &str = "TABDESK_DATA_DIR";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

#[cfg(target_os = "linux")]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join("tabdesk"),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join("tabdesk"),
    }
}

/// Returns the directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("Tabdesk")
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA").map(PathBuf::from).unwrap_or_else(|_| home_dir());
        appdata.join("Tabdesk")
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        home_dir().join(".tabdesk")
    }
}

/// Returns the directory holding the durable workspace store.
/// `$TABDESK_DATA_DIR` takes precedence over the platform default.
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
    #[cfg(not(target_os = "linux"))]
    {
        get_config_dir()
    }
}
