//! Key-value storage media for the workspace snapshot.
//!
//! The session adapter only ever talks to [`KeyValueStore`], so hosts can
//! swap a process-scoped [`MemoryStore`] for a durable [`SqliteStore`], and
//! wrap either in an [`EncryptedStore`].

pub mod encrypted;
pub mod memory;
pub mod sqlite;

pub use encrypted::EncryptedStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::types::errors::StorageError;

/// A string-valued key-value store.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
