//! # Discovery Trust Pipeline
//!
//! Decides whether a smart-home device found through DNS-SD can be shown to
//! the user. Every field of a discovery record is attacker-controlled; this
//! crate sanitizes it, validates it against the HomeKit and Matter
//! conventions, throttles chatty identities and flags suspicious patterns.
//!
//! ## Architecture
//!
//! - **Domain:** sanitizer, protocol validator, anomaly detector, entities,
//!   configuration values. Pure and stateless.
//! - **Ports:** `TrustPipelineApi` (inbound); `RateLimiter`, `TimeSource`,
//!   `ConfigProvider` (outbound).
//! - **Adapters:** sharded windowed rate limiter, system clock, TOML config.
//! - **Service:** `TrustPipeline`, composing the gates.
//!
//! ## Example
//!
//! ```rust
//! use hk_01_discovery_trust::{sanitize_name, is_acceptable_discovery_result};
//!
//! assert_eq!(sanitize_name("Lamp<script>").as_str(), "Lamp>");
//! assert!(is_acceptable_discovery_result("Lamp", "_hap._tcp", "local."));
//! assert!(!is_acceptable_discovery_result("Lamp", "_hap._tcp", "evil.com."));
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Test utilities (FixedTimeSource)
/// Requires feature: `test-utils`
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Domain
pub use domain::{
    check_discovery_result, find_anomalies, find_anomalies_default, is_acceptable_attribute_set,
    is_acceptable_discovery_result, is_valid_address, is_valid_attribute_key, is_valid_device_id,
    is_valid_port, sanitize_address, sanitize_attribute, sanitize_attribute_value,
    sanitize_binary_attribute, sanitize_name, validate_attribute_set, AnomalyFinding,
    AnomalyThresholds, AttributeMap, AttributeValue, ConfigError, DeviceIdentity,
    DeviceObservation, DiscoveredDevice, DiscoveryRecord, RateLimitConfig, RejectReason,
    SanitizedText, ServiceType, Timestamp, TrustConfig, LOCAL_DOMAIN,
};

// Ports
pub use ports::{ConfigProvider, PipelineOutcome, RateLimiter, TimeSource, TrustPipelineApi};

// Adapters
pub use adapters::{
    NoOpRateLimiter, RateLimiterStats, StaticConfigProvider, SystemTimeSource, TomlConfigProvider,
    WindowedRateLimiter,
};

// Service
pub use service::TrustPipeline;

#[cfg(feature = "test-utils")]
pub use test_utils::FixedTimeSource;
