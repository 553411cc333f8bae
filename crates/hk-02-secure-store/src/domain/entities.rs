/// Result of `SecureStore::migrate_legacy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The target key already held data; the legacy copy was not touched.
    AlreadyPresent,
    /// The legacy location was empty.
    NothingToMigrate,
    /// Legacy bytes were written to the target key.
    ///
    /// `legacy_removed` is false when the legacy copy could not be deleted;
    /// it will be found again, and skipped, on the next migration attempt.
    Migrated { legacy_removed: bool },
}

/// Bytes authenticated alongside a sealed value: `namespace || 0x00 || key`.
///
/// Binds every ciphertext to its slot so it cannot be replayed under
/// another key or namespace.
pub fn associated_data(namespace: &str, key: &str) -> Vec<u8> {
    let mut aad = Vec::with_capacity(namespace.len() + 1 + key.len());
    aad.extend_from_slice(namespace.as_bytes());
    aad.push(0);
    aad.extend_from_slice(key.as_bytes());
    aad
}
