//! # Secure Store
//!
//! Generic encrypted key-value persistence for derived device state
//! (confidence caches, notes) with a one-time migration path from the
//! unencrypted store earlier releases used.
//!
//! ## Architecture
//!
//! - **Domain:** errors, migration outcome, associated-data layout
//! - **Ports:** `EncryptedBackend`, `LegacyStore`
//! - **Adapters:** `InMemoryVault`, `FileVault` (XChaCha20-Poly1305 via
//!   `shared-crypto`), `MemoryLegacyStore`, `DirectoryLegacyStore`
//! - **Service:** `SecureStore`
//!
//! ## Error Model
//!
//! | Condition | Result |
//! |-----------|--------|
//! | key absent | `Ok(None)` / `Ok(())` |
//! | value fails to serialize | `StoreError::EncodingFailure` |
//! | payload fails to deserialize | `StoreError::DecodingFailure` |
//! | backend refuses | `StoreError::BackendFailure { code, .. }` |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{DirectoryLegacyStore, FileVault, InMemoryVault, MemoryLegacyStore, KEY_FILE_NAME};
pub use domain::{associated_data, BackendError, MigrationOutcome, StoreError};
pub use ports::{EncryptedBackend, LegacyStore};
pub use service::SecureStore;
