//! # Adopter Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs        # Shared fixtures and tracing setup
//! └── integration/      # Cross-crate flows
//!     ├── discovery.rs  # Record -> TrustPipeline -> DiscoveredDevice
//!     └── persistence.rs# Accepted devices -> SecureStore -> restart
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hk-tests
//! cargo bench -p hk-tests
//! ```

pub mod integration;
pub mod support;
