//! # Ports Layer
//!
//! Driven ports only: the store is a library called directly by its host.

pub mod outbound;

pub use outbound::{EncryptedBackend, LegacyStore};
