//! # Store Errors
//!
//! A missing key is never an error anywhere in the store contract.

use thiserror::Error;

/// Failure reported by an encrypted backend.
///
/// `code` mirrors a platform status code. The constants below are the codes
/// the bundled adapters produce; other backends may use their own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend status {code}: {message}")]
pub struct BackendError {
    pub code: i32,
    pub message: String,
}

impl BackendError {
    /// Filesystem read or write failed.
    pub const IO: i32 = -1;
    /// Persisted data is structurally damaged.
    pub const CORRUPT: i32 = -2;
    /// A sealed value failed authentication.
    pub const AUTHENTICATION: i32 = -3;
    /// Sealing a value failed.
    pub const ENCRYPTION: i32 = -4;
    /// The vault key could not be loaded.
    pub const KEY_UNAVAILABLE: i32 = -5;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn io(error: &std::io::Error) -> Self {
        Self::new(Self::IO, error.to_string())
    }

    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::new(Self::CORRUPT, message)
    }
}

/// Errors surfaced by `SecureStore`. All are recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The value could not be serialized.
    #[error("Failed to encode value for {key}: {message}")]
    EncodingFailure { key: String, message: String },

    /// A stored payload could not be decoded into the requested type.
    #[error("Failed to decode value for {key}: {message}")]
    DecodingFailure { key: String, message: String },

    /// The backend rejected the operation.
    #[error("Backend failure {code}: {message}")]
    BackendFailure { code: i32, message: String },
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        Self::BackendFailure {
            code: err.code,
            message: err.message,
        }
    }
}
