//! # Shared Crypto - Encryption at Rest
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `symmetric` | XChaCha20-Poly1305 | Sealing stored values with associated data |
//! | `key_file` | CSPRNG | Self-managed vault key on disk |
//!
//! ## Security Properties
//!
//! - **XChaCha20**: 192-bit random nonce per seal, constant-time ARX design
//! - **Poly1305**: every sealed blob is authenticated together with its
//!   associated data, so a blob moved to another slot fails to open
//! - **Zeroize**: key material is wiped on drop

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod key_file;
pub mod symmetric;

// Re-exports
pub use errors::CryptoError;
pub use key_file::load_or_generate_key;
pub use symmetric::{open, seal, Nonce, SecretKey, KEY_LEN, NONCE_LEN, TAG_LEN};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
