//! # Integration Flows
//!
//! Exercise the crates together the way the host application wires them:
//! one `TrustPipeline` and one `SecureStore` per process, constructed at
//! startup and shared by every discovery callback.

mod discovery;
mod persistence;
