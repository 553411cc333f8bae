//! # Driven Ports (Outbound SPI)

use crate::domain::BackendError;

/// Platform capability that keeps values encrypted at rest.
///
/// Implementations receive and return plaintext; encryption happens inside.
/// Operations on the same `(namespace, key)` must be serialized; distinct
/// keys may proceed concurrently. Every call may block.
///
/// Production: `FileVault` (or a platform keychain adapter in the host)
/// Testing: `InMemoryVault`
pub trait EncryptedBackend: Send + Sync {
    /// Insert or fully replace the value at `key`.
    fn put(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), BackendError>;

    /// `Ok(None)` when the key is absent.
    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Absent key is success.
    fn delete(&self, namespace: &str, key: &str) -> Result<(), BackendError>;

    /// Remove every entry in `namespace`. Absent namespace is success.
    fn delete_all(&self, namespace: &str) -> Result<(), BackendError>;

    /// Keys present in `namespace`, sorted.
    fn list_keys(&self, namespace: &str) -> Result<Vec<String>, BackendError>;

    fn contains(&self, namespace: &str, key: &str) -> Result<bool, BackendError> {
        Ok(self.get(namespace, key)?.is_some())
    }
}

/// Unencrypted storage written by earlier releases.
pub trait LegacyStore: Send + Sync {
    /// `Ok(None)` when nothing is stored at `key`.
    fn read_raw(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError>;

    /// Absent key is success.
    fn remove(&self, key: &str) -> Result<(), BackendError>;
}
