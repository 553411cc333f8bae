//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption or authentication failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Invalid key length
    #[error("Invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Sealed blob is shorter than nonce plus tag
    #[error("Sealed payload truncated: {actual} bytes, need at least {minimum}")]
    Truncated {
        /// Minimum sealed length in bytes
        minimum: usize,
        /// Actual sealed length in bytes
        actual: usize,
    },

    /// Key file could not be read or written
    #[error("Key file I/O error at {path}: {message}")]
    KeyFileIo {
        /// Path of the key file
        path: String,
        /// Underlying error message
        message: String,
    },
}
