use crate::domain::BackendError;
use crate::ports::EncryptedBackend;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Process-local backend for tests and ephemeral use.
///
/// Nothing is encrypted and nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryVault {
    namespaces: RwLock<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.read().values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EncryptedBackend for InMemoryVault {
    fn put(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), BackendError> {
        self.namespaces
            .write()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self
            .namespaces
            .read()
            .get(namespace)
            .and_then(|entries| entries.get(key).cloned()))
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<(), BackendError> {
        if let Some(entries) = self.namespaces.write().get_mut(namespace) {
            entries.remove(key);
        }
        Ok(())
    }

    fn delete_all(&self, namespace: &str) -> Result<(), BackendError> {
        self.namespaces.write().remove(namespace);
        Ok(())
    }

    fn list_keys(&self, namespace: &str) -> Result<Vec<String>, BackendError> {
        Ok(self
            .namespaces
            .read()
            .get(namespace)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }
}
