use thiserror::Error;

// === TabError ===

/// Errors raised by workspace lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TabError {
    /// Opening another tab would exceed the configured limit.
    #[error("Tab limit reached: at most {max} tabs can be open")]
    CapacityExceeded { max: usize },
    /// The tab is flagged as not closable.
    #[error("Tab cannot be closed: {0}")]
    NotClosable(String),
    /// Tab with the given ID was not found.
    #[error("Tab not found: {0}")]
    NotFound(String),
    /// The requested workspace configuration conflicts with the open tabs.
    #[error("Invalid workspace config: {0}")]
    InvalidConfig(String),
    /// The state cannot be reported for a tab directly.
    #[error("Invalid tab state: {0}")]
    InvalidState(String),
}

// === StorageError ===

/// Errors from the key-value storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Storage database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Sealing or opening an encrypted value failed.
    #[error("Storage crypto error: {0}")]
    Crypto(#[from] CryptoError),
    /// A stored value could not be decoded.
    #[error("Storage encoding error: {0}")]
    Encoding(String),
    /// The storage medium could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

// === SessionError ===

/// Errors related to saving and restoring the workspace snapshot.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The storage medium rejected the read or write.
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
    /// The snapshot could not be serialized or parsed.
    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// === CryptoError ===

/// Errors related to cryptographic operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption operation failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),
    /// Decryption operation failed.
    #[error("Decryption failed: {0}")]
    Decryption(String),
    /// Failed to generate random bytes.
    #[error("Random generation failed: {0}")]
    RandomGeneration(String),
    /// The provided key is invalid.
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

// === SettingsError ===

/// Errors related to loading and updating shell settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Reading or writing the settings file failed.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// The settings file is not valid JSON for `ShellSettings`.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The dot-path key does not exist.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The value does not fit the key's type.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === AuditError ===

/// Errors from the task audit service. Only ever logged.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The HTTP request failed or returned a non-success status.
    #[error("Audit request failed: {0}")]
    Request(#[from] reqwest::Error),
}
