//! # Ports Layer
//!
//! - **Driving Port (Inbound):** `TrustPipelineApi`, consumed by the discovery
//!   layer for every decoded announcement.
//! - **Driven Ports (Outbound):** clock, rate limiter and configuration
//!   source the pipeline depends on.

pub mod inbound;
pub mod outbound;

pub use inbound::{PipelineOutcome, TrustPipelineApi};
pub use outbound::{ConfigProvider, RateLimiter, TimeSource};
