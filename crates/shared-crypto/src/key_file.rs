//! # Vault Key File
//!
//! Self-managed key storage for targets without a platform keychain. The key
//! is kept as 32 raw bytes next to the vault; on Unix the file is created
//! with mode `0600`.

use crate::symmetric::SecretKey;
use crate::CryptoError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Load the key at `path`, generating and persisting a fresh one if absent.
///
/// # Errors
///
/// - `CryptoError::KeyFileIo` if the file cannot be read or written
/// - `CryptoError::InvalidKeyLength` if an existing file is not 32 bytes
pub fn load_or_generate_key<P: AsRef<Path>>(path: P) -> Result<SecretKey, CryptoError> {
    let path = path.as_ref();
    let io_err = |e: std::io::Error| CryptoError::KeyFileIo {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    match fs::read(path) {
        Ok(mut bytes) => {
            let key = SecretKey::from_slice(&bytes);
            zeroize::Zeroize::zeroize(&mut bytes);
            key
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let key = SecretKey::generate();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }

            let temp_path = path.with_extension("tmp");
            let mut file = create_private(&temp_path).map_err(io_err)?;
            file.write_all(key.as_bytes()).map_err(io_err)?;
            file.sync_all().map_err(io_err)?;
            fs::rename(&temp_path, path).map_err(io_err)?;

            Ok(key)
        }
        Err(e) => Err(io_err(e)),
    }
}

#[cfg(unix)]
fn create_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}
