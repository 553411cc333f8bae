//! # Domain Layer
//!
//! Pure logic with no I/O: sanitizer, protocol validator, anomaly detector,
//! entities and configuration values.

pub mod anomaly;
pub mod config;
pub mod entities;
pub mod errors;
pub mod protocol;
pub mod sanitizer;

pub use anomaly::{find_anomalies, find_anomalies_default, AnomalyFinding};
pub use config::{AnomalyThresholds, ConfigError, RateLimitConfig, TrustConfig};
pub use entities::{
    AttributeMap, AttributeValue, DeviceIdentity, DeviceObservation, DiscoveredDevice,
    DiscoveryRecord, SanitizedText, ServiceType, Timestamp,
};
pub use errors::RejectReason;
pub use protocol::{
    check_discovery_result, is_acceptable_attribute_set, is_acceptable_discovery_result,
    is_valid_device_id, LOCAL_DOMAIN,
};
pub use sanitizer::{
    is_valid_address, is_valid_attribute_key, is_valid_port, sanitize_address,
    sanitize_attribute, sanitize_attribute_value, sanitize_binary_attribute, sanitize_name,
    validate_attribute_set,
};
