//! Display and conversion checks for the error types.

use tabdesk::types::errors::{CryptoError, SessionError, SettingsError, StorageError, TabError};

#[test]
fn test_tab_error_messages() {
    assert_eq!(
        TabError::CapacityExceeded { max: 10 }.to_string(),
        "Tab limit reached: at most 10 tabs can be open"
    );
    assert_eq!(
        TabError::NotClosable("t1".to_string()).to_string(),
        "Tab cannot be closed: t1"
    );
    assert_eq!(TabError::NotFound("t2".to_string()).to_string(), "Tab not found: t2");
    assert!(TabError::InvalidConfig("maxTabs".to_string())
        .to_string()
        .contains("maxTabs"));
    assert_eq!(
        TabError::InvalidState("MINIMIZED".to_string()).to_string(),
        "Invalid tab state: MINIMIZED"
    );
}

#[test]
fn test_not_closable_is_distinct_from_not_found() {
    assert_ne!(
        TabError::NotClosable("t".to_string()),
        TabError::NotFound("t".to_string())
    );
}

#[test]
fn test_storage_error_wraps_crypto_error() {
    let err: StorageError = CryptoError::Decryption("bad tag".to_string()).into();
    assert!(matches!(err, StorageError::Crypto(_)));
    assert!(err.to_string().contains("bad tag"));
}

#[test]
fn test_session_error_wraps_storage_error() {
    let err: SessionError = StorageError::Unavailable("quota".to_string()).into();
    assert_eq!(
        err.to_string(),
        "Session storage error: Storage unavailable: quota"
    );
}

#[test]
fn test_session_error_from_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: SessionError = json_err.into();
    assert!(matches!(err, SessionError::Serialization(_)));
}

#[test]
fn test_settings_error_display() {
    assert_eq!(
        SettingsError::InvalidKey("a.b".to_string()).to_string(),
        "Invalid settings key: a.b"
    );
}

#[test]
fn test_errors_are_std_errors() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<TabError>();
    assert_error::<StorageError>();
    assert_error::<SessionError>();
    assert_error::<CryptoError>();
    assert_error::<SettingsError>();
}
