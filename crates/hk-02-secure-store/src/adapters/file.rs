//! # Encrypted File Vault
//!
//! Self-managed encrypted storage for targets without a platform keychain.
//!
//! ## Layout
//!
//! One file per namespace, `<hex(namespace)>.vault`, inside the vault
//! directory:
//!
//! ```text
//! "HKV1" [key_len:u32 LE][key utf-8][sealed_len:u32 LE][sealed]...
//! ```
//!
//! `sealed` is `nonce || ciphertext || tag` from `shared_crypto::seal`, with
//! `namespace || 0x00 || key` as associated data. Every write rewrites the
//! namespace file through a temp file and rename.

use crate::domain::{associated_data, BackendError};
use crate::ports::EncryptedBackend;
use parking_lot::Mutex;
use shared_crypto::{load_or_generate_key, open, seal, SecretKey};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Vault key file created by [`FileVault::open_with_key_file`].
pub const KEY_FILE_NAME: &str = "vault.key";

const FILE_MAGIC: &[u8; 4] = b"HKV1";
const VAULT_EXTENSION: &str = "vault";

type SealedEntries = BTreeMap<String, Vec<u8>>;

/// File-backed `EncryptedBackend`.
///
/// Namespace files are loaded on first use and cached sealed; values are
/// only decrypted on `get`.
pub struct FileVault {
    root: PathBuf,
    key: SecretKey,
    namespaces: Mutex<HashMap<String, SealedEntries>>,
}

impl std::fmt::Debug for FileVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileVault")
            .field("root", &self.root)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl FileVault {
    /// Open (creating if needed) a vault directory with a caller-held key.
    pub fn open<P: AsRef<Path>>(root: P, key: SecretKey) -> Result<Self, BackendError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root).map_err(|e| BackendError::io(&e))?;
        tracing::info!(root = %root.display(), "file vault opened");

        Ok(Self {
            root,
            key,
            namespaces: Mutex::new(HashMap::new()),
        })
    }

    /// Open a vault whose key lives in `root/vault.key`, generating it on
    /// first use.
    pub fn open_with_key_file<P: AsRef<Path>>(root: P) -> Result<Self, BackendError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|e| BackendError::io(&e))?;
        let key = load_or_generate_key(root.join(KEY_FILE_NAME))
            .map_err(|e| BackendError::new(BackendError::KEY_UNAVAILABLE, e.to_string()))?;
        Self::open(root, key)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding `namespace`.
    pub fn namespace_path(&self, namespace: &str) -> PathBuf {
        self.root.join(format!(
            "{}.{VAULT_EXTENSION}",
            hex::encode(namespace.as_bytes())
        ))
    }

    /// Run `f` on the cached entries of `namespace`, loading them first if needed.
    fn with_entries<R>(
        &self,
        namespace: &str,
        f: impl FnOnce(&mut SealedEntries, &Path) -> Result<R, BackendError>,
    ) -> Result<R, BackendError> {
        let path = self.namespace_path(namespace);
        let mut cache = self.namespaces.lock();
        let entries = match cache.entry(namespace.to_string()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => vacant.insert(load_entries(&path)?),
        };
        f(entries, &path)
    }
}

impl EncryptedBackend for FileVault {
    fn put(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), BackendError> {
        let sealed = seal(&self.key, value, &associated_data(namespace, key))
            .map_err(|e| BackendError::new(BackendError::ENCRYPTION, e.to_string()))?;

        self.with_entries(namespace, |entries, path| {
            let previous = entries.insert(key.to_string(), sealed);
            if let Err(e) = write_entries(path, entries) {
                match previous {
                    Some(previous) => entries.insert(key.to_string(), previous),
                    None => entries.remove(key),
                };
                return Err(e);
            }
            Ok(())
        })
    }

    fn get(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, BackendError> {
        let sealed = self.with_entries(namespace, |entries, _| Ok(entries.get(key).cloned()))?;
        let Some(sealed) = sealed else {
            return Ok(None);
        };

        open(&self.key, &sealed, &associated_data(namespace, key))
            .map(Some)
            .map_err(|e| {
                tracing::warn!(namespace = %namespace, key = %key, "sealed value failed authentication");
                BackendError::new(BackendError::AUTHENTICATION, e.to_string())
            })
    }

    fn delete(&self, namespace: &str, key: &str) -> Result<(), BackendError> {
        self.with_entries(namespace, |entries, path| {
            let Some(previous) = entries.remove(key) else {
                return Ok(());
            };
            if let Err(e) = write_entries(path, entries) {
                entries.insert(key.to_string(), previous);
                return Err(e);
            }
            Ok(())
        })
    }

    fn delete_all(&self, namespace: &str) -> Result<(), BackendError> {
        let path = self.namespace_path(namespace);
        let mut cache = self.namespaces.lock();

        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(BackendError::io(&e)),
        }
        cache.insert(namespace.to_string(), SealedEntries::new());
        tracing::debug!(namespace = %namespace, "vault namespace cleared");
        Ok(())
    }

    fn list_keys(&self, namespace: &str) -> Result<Vec<String>, BackendError> {
        self.with_entries(namespace, |entries, _| Ok(entries.keys().cloned().collect()))
    }
}

// =============================================================================
// FILE FORMAT
// =============================================================================

fn load_entries(path: &Path) -> Result<SealedEntries, BackendError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SealedEntries::new()),
        Err(e) => return Err(BackendError::io(&e)),
    };

    let body = bytes
        .strip_prefix(FILE_MAGIC.as_slice())
        .ok_or_else(|| BackendError::corrupt(format!("bad header in {}", path.display())))?;

    let mut entries = SealedEntries::new();
    let mut cursor = 0;
    while cursor < body.len() {
        let key = read_field(body, &mut cursor)?;
        let key = String::from_utf8(key.to_vec())
            .map_err(|_| BackendError::corrupt("record key is not UTF-8"))?;
        let sealed = read_field(body, &mut cursor)?;
        entries.insert(key, sealed.to_vec());
    }

    tracing::debug!(path = %path.display(), entries = entries.len(), "vault namespace loaded");
    Ok(entries)
}

fn read_field<'a>(body: &'a [u8], cursor: &mut usize) -> Result<&'a [u8], BackendError> {
    let len_end = *cursor + 4;
    let len_bytes: [u8; 4] = body
        .get(*cursor..len_end)
        .and_then(|slice| slice.try_into().ok())
        .ok_or_else(|| BackendError::corrupt("truncated record length"))?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    let field = body
        .get(len_end..len_end + len)
        .ok_or_else(|| BackendError::corrupt("truncated record"))?;
    *cursor = len_end + len;
    Ok(field)
}

fn write_entries(path: &Path, entries: &SealedEntries) -> Result<(), BackendError> {
    let mut bytes = FILE_MAGIC.to_vec();
    for (key, sealed) in entries {
        write_field(&mut bytes, key.as_bytes())?;
        write_field(&mut bytes, sealed)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = std::fs::File::create(&temp_path).map_err(|e| BackendError::io(&e))?;
    file.write_all(&bytes).map_err(|e| BackendError::io(&e))?;
    file.sync_all().map_err(|e| BackendError::io(&e))?;
    std::fs::rename(&temp_path, path).map_err(|e| BackendError::io(&e))?;
    Ok(())
}

fn write_field(out: &mut Vec<u8>, field: &[u8]) -> Result<(), BackendError> {
    let len = u32::try_from(field.len())
        .map_err(|_| BackendError::new(BackendError::IO, "record exceeds 4 GiB"))?;
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(field);
    Ok(())
}
