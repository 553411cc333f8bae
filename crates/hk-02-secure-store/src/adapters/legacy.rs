use crate::domain::BackendError;
use crate::ports::LegacyStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

// ============================================================================
// MemoryLegacyStore
// ============================================================================

/// In-memory legacy store, seeded by tests.
#[derive(Debug, Default)]
pub struct MemoryLegacyStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryLegacyStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.entries.write().insert(key.into(), value.into());
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }
}

impl LegacyStore for MemoryLegacyStore {
    fn read_raw(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// ============================================================================
// DirectoryLegacyStore
// ============================================================================

/// Plain files in one directory, one per key.
///
/// File names are the hex encoding of the key, so any key maps to a safe
/// name inside the directory.
#[derive(Debug, Clone)]
pub struct DirectoryLegacyStore {
    root: PathBuf,
}

impl DirectoryLegacyStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(hex::encode(key.as_bytes()))
    }
}

impl LegacyStore for DirectoryLegacyStore {
    fn read_raw(&self, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::io(&e)),
        }
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackendError::io(&e)),
        }
    }
}
