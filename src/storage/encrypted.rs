//! Storage decorator sealing every value with AES-256-GCM.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use zeroize::Zeroizing;

use super::KeyValueStore;
use crate::services::crypto_service::{CryptoService, CryptoServiceTrait, EncryptedData};
use crate::types::errors::StorageError;

/// Wraps another store so values at rest are opaque. Keys stay in clear text.
///
/// Values are stored as base64 of `iv || ciphertext || tag`.
pub struct EncryptedStore<S> {
    inner: S,
    crypto: CryptoService,
    key: Zeroizing<Vec<u8>>,
}

impl<S: KeyValueStore> EncryptedStore<S> {
    /// Derives the sealing key from `passphrase` and `salt` with PBKDF2.
    pub fn new(inner: S, passphrase: &str, salt: &[u8]) -> Result<Self, StorageError> {
        let crypto = CryptoService::new();
        let key = Zeroizing::new(crypto.derive_key(passphrase, salt)?);
        Ok(Self { inner, crypto, key })
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: KeyValueStore> KeyValueStore for EncryptedStore<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let Some(encoded) = self.inner.get(key)? else {
            return Ok(None);
        };
        let packed = BASE64
            .decode(encoded.as_bytes())
            .map_err(|e| StorageError::Encoding(format!("base64 decode error: {}", e)))?;
        let sealed = EncryptedData::from_bytes(&packed)
            .ok_or_else(|| StorageError::Encoding("sealed value too short".to_string()))?;
        let plain = self.crypto.decrypt_aes256gcm(&sealed, &self.key)?;
        String::from_utf8(plain)
            .map(Some)
            .map_err(|e| StorageError::Encoding(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let sealed = self.crypto.encrypt_aes256gcm(value.as_bytes(), &self.key)?;
        self.inner.set(key, &BASE64.encode(sealed.to_bytes()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
