//! # Domain Entities
//!
//! Records flowing through the trust pipeline, from the raw decoded
//! announcement to the accepted `DiscoveredDevice`.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;
use std::time::Duration;

// =============================================================================
// TIME
// =============================================================================

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Create from milliseconds since the epoch.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create from whole seconds since the epoch.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs.saturating_mul(1000))
    }

    /// Milliseconds since the epoch.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn elapsed_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    /// This timestamp advanced by `duration`.
    pub fn saturating_add(&self, duration: Duration) -> Self {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(millis))
    }
}

// =============================================================================
// SANITIZED TEXT
// =============================================================================

/// Text that has passed through the sanitizer.
///
/// Bounded in length, free of disallowed control characters and of the
/// injection blacklists, trimmed. Only `domain::sanitizer` constructs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SanitizedText(String);

impl SanitizedText {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for SanitizedText {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SanitizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ATTRIBUTES
// =============================================================================

/// A single attribute value as received (TXT record payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Value that the transport already decoded as text.
    Text(String),
    /// Raw bytes.
    Binary(Vec<u8>),
}

impl AttributeValue {
    /// View the value as UTF-8 text, if it is text or decodable bytes.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }

    /// Whether the value carries a NUL byte.
    pub fn contains_nul(&self) -> bool {
        match self {
            Self::Text(text) => text.contains('\0'),
            Self::Binary(bytes) => bytes.contains(&0),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

/// Raw attribute set keyed by attribute name, as received.
pub type AttributeMap = BTreeMap<String, AttributeValue>;

// =============================================================================
// SERVICE TYPES
// =============================================================================

/// Service types the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ServiceType {
    /// HomeKit accessory over IP.
    #[serde(rename = "_hap._tcp")]
    HapTcp,
    /// HomeKit accessory over Thread.
    #[serde(rename = "_hap._udp")]
    HapUdp,
    /// Matter device in commissioning mode.
    #[serde(rename = "_matterc._udp")]
    MatterCommissionable,
}

impl ServiceType {
    /// All accepted service types.
    pub const ALL: [ServiceType; 3] = [Self::HapTcp, Self::HapUdp, Self::MatterCommissionable];

    /// Parse the DNS-SD service type string.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }

    /// DNS-SD service type string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HapTcp => "_hap._tcp",
            Self::HapUdp => "_hap._udp",
            Self::MatterCommissionable => "_matterc._udp",
        }
    }

    /// Whether this is a HomeKit Accessory Protocol service.
    pub const fn is_homekit(&self) -> bool {
        matches!(self, Self::HapTcp | Self::HapUdp)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// Decoded announcement handed over by the discovery transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRecord {
    pub name: String,
    pub service_type: String,
    pub domain: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub attributes: AttributeMap,
}

impl DiscoveryRecord {
    /// Record with no host, port or attributes.
    pub fn new(
        name: impl Into<String>,
        service_type: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            service_type: service_type.into(),
            domain: domain.into(),
            host: None,
            port: None,
            attributes: AttributeMap::new(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = Some(host.into());
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Stable key for one device: sanitized name plus service type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    /// Derive the identity of a device.
    pub fn derive(name: &SanitizedText, service_type: ServiceType) -> Self {
        Self(format!("{}|{}", name.as_str(), service_type.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record that passed every gate, with all free text sanitized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscoveredDevice {
    pub identity: DeviceIdentity,
    pub name: SanitizedText,
    pub service_type: ServiceType,
    pub domain: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub attributes: BTreeMap<String, SanitizedText>,
    pub accepted_at: Timestamp,
}

impl DiscoveredDevice {
    /// History entry for anomaly detection.
    pub fn observation(&self) -> DeviceObservation {
        DeviceObservation {
            name: self.name.as_str().to_string(),
            host: self.host.clone(),
            port: self.port,
            service_type: self.service_type,
            attribute_count: self.attributes.len(),
        }
    }
}

/// What the anomaly detector compares: one sighting of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceObservation {
    pub name: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub service_type: ServiceType,
    pub attribute_count: usize,
}

impl DeviceObservation {
    pub fn new(name: impl Into<String>, service_type: ServiceType) -> Self {
        Self {
            name: name.into(),
            host: None,
            port: None,
            service_type,
            attribute_count: 0,
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    #[must_use]
    pub fn with_attribute_count(mut self, count: usize) -> Self {
        self.attribute_count = count;
        self
    }
}
