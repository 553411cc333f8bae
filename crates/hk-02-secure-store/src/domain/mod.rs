//! # Domain Layer

pub mod entities;
pub mod errors;

pub use entities::{associated_data, MigrationOutcome};
pub use errors::{BackendError, StoreError};
