//! # Adapters
//!
//! | Port | Test | Production |
//! |------|------|------------|
//! | `EncryptedBackend` | `InMemoryVault` | `FileVault` |
//! | `LegacyStore` | `MemoryLegacyStore` | `DirectoryLegacyStore` |

mod file;
mod legacy;
mod memory;

pub use file::{FileVault, KEY_FILE_NAME};
pub use legacy::{DirectoryLegacyStore, MemoryLegacyStore};
pub use memory::InMemoryVault;
