//! # Secure Store Service
//!
//! Typed, namespace-scoped access to an `EncryptedBackend`.
//!
//! Values are encoded as JSON before they reach the backend. A stored value
//! is replaced wholesale on every `store`; nothing is merged.

use crate::domain::{BackendError, MigrationOutcome, StoreError};
use crate::ports::{EncryptedBackend, LegacyStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Encrypted key-value store for one application namespace.
///
/// Construct one per namespace at startup and share it; clones are cheap and
/// use the same backend.
///
/// ```rust
/// use hk_02_secure_store::{InMemoryVault, SecureStore};
/// use std::sync::Arc;
///
/// let store = SecureStore::new(Arc::new(InMemoryVault::new()), "com.example.adopter");
/// store.store(&vec![1u32, 2, 3], "confidence-cache").unwrap();
///
/// let cached: Option<Vec<u32>> = store.retrieve("confidence-cache").unwrap();
/// assert_eq!(cached, Some(vec![1, 2, 3]));
/// ```
pub struct SecureStore<B: EncryptedBackend> {
    backend: Arc<B>,
    namespace: String,
}

impl<B: EncryptedBackend> Clone for SecureStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            namespace: self.namespace.clone(),
        }
    }
}

impl<B: EncryptedBackend> std::fmt::Debug for SecureStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureStore")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

impl<B: EncryptedBackend> SecureStore<B> {
    pub fn new(backend: Arc<B>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Serialize `value` and upsert it under `key`.
    pub fn store<T: Serialize + ?Sized>(&self, value: &T, key: &str) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value).map_err(|e| StoreError::EncodingFailure {
            key: key.to_string(),
            message: e.to_string(),
        })?;

        self.backend
            .put(&self.namespace, key, &bytes)
            .map_err(|e| self.backend_failure("store", key, e))?;

        tracing::debug!(namespace = %self.namespace, key = %key, bytes = bytes.len(), "value stored");
        Ok(())
    }

    /// `Ok(None)` when nothing is stored under `key`.
    pub fn retrieve<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(bytes) = self.read(key)? else {
            return Ok(None);
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| {
                tracing::warn!(namespace = %self.namespace, key = %key, "stored value did not decode");
                StoreError::DecodingFailure {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            })
    }

    /// Absent key is success.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend
            .delete(&self.namespace, key)
            .map_err(|e| self.backend_failure("delete", key, e))
    }

    /// Remove every entry in this namespace.
    pub fn delete_all(&self) -> Result<(), StoreError> {
        self.backend
            .delete_all(&self.namespace)
            .map_err(|e| self.backend_failure("delete_all", "*", e))?;
        tracing::info!(namespace = %self.namespace, "secure store cleared");
        Ok(())
    }

    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.backend
            .contains(&self.namespace, key)
            .map_err(|e| self.backend_failure("exists", key, e))
    }

    pub fn store_string(&self, value: &str, key: &str) -> Result<(), StoreError> {
        self.store(value, key)
    }

    pub fn retrieve_string(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.retrieve(key)
    }

    /// Keys in this namespace, sorted. Diagnostic use.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = self
            .backend
            .list_keys(&self.namespace)
            .map_err(|e| self.backend_failure("keys", "*", e))?;
        keys.sort_unstable();
        Ok(keys)
    }

    /// Sum of the encoded payload sizes in this namespace, in bytes.
    ///
    /// Keys deleted between listing and reading are skipped.
    pub fn total_size(&self) -> Result<u64, StoreError> {
        let mut total = 0u64;
        for key in self.keys()? {
            if let Some(bytes) = self.read(&key)? {
                total += bytes.len() as u64;
            }
        }
        Ok(total)
    }

    /// Move one value from an unencrypted legacy location into this store.
    ///
    /// Idempotent. The legacy copy is removed only after the encrypted write
    /// succeeded; if removal fails the copy lingers and the outcome says so.
    pub fn migrate_legacy<L: LegacyStore + ?Sized>(
        &self,
        legacy: &L,
        key: &str,
        legacy_key: &str,
    ) -> Result<MigrationOutcome, StoreError> {
        if self.exists(key)? {
            tracing::debug!(namespace = %self.namespace, key = %key, "migration skipped, key present");
            return Ok(MigrationOutcome::AlreadyPresent);
        }

        let Some(raw) = legacy
            .read_raw(legacy_key)
            .map_err(|e| self.backend_failure("legacy read", legacy_key, e))?
        else {
            return Ok(MigrationOutcome::NothingToMigrate);
        };

        self.backend
            .put(&self.namespace, key, &raw)
            .map_err(|e| self.backend_failure("migrate", key, e))?;

        let legacy_removed = match legacy.remove(legacy_key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    legacy_key = %legacy_key,
                    code = e.code,
                    error = %e.message,
                    "migrated value but legacy copy could not be removed"
                );
                false
            }
        };

        tracing::info!(
            namespace = %self.namespace,
            key = %key,
            bytes = raw.len(),
            legacy_removed,
            "legacy value migrated"
        );
        Ok(MigrationOutcome::Migrated { legacy_removed })
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.backend
            .get(&self.namespace, key)
            .map_err(|e| self.backend_failure("retrieve", key, e))
    }

    fn backend_failure(&self, operation: &str, key: &str, error: BackendError) -> StoreError {
        tracing::warn!(
            namespace = %self.namespace,
            key = %key,
            operation,
            code = error.code,
            error = %error.message,
            "secure store backend failure"
        );
        error.into()
    }
}
