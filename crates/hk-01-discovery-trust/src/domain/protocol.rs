//! # Protocol Validator
//!
//! Accept/reject decisions for discovery results and their attribute sets.
//!
//! Structural and range violations reject the record. Identity format
//! variance does not: vendors disagree on the shape of `id`, so a mismatch
//! is only logged.
//!
//! ## Attribute Ranges (checked only when present)
//!
//! | Key | Meaning | Rule |
//! |-----|---------|------|
//! | `sf` | status flags | integer in 0..=255, required to parse |
//! | `ci` | accessory category | integer in 1..=32, required to parse |
//! | `pv` | protocol version | if numeric, 0..=100 |
//! | `c#` | configuration number | if integer, 0..=1_000_000 |
//! | `id` | device identifier | MAC or UUID shape, advisory |
//!
//! Range checks run after the structural gate. `c#` falls outside the key
//! alphabet, so a set carrying it is rejected there and its range rule only
//! backs up the grammar.

use super::entities::{AttributeMap, ServiceType};
use super::errors::RejectReason;
use super::sanitizer::{validate_attribute_set, MAX_NAME_LENGTH};

/// The only discovery domain accepted.
pub const LOCAL_DOMAIN: &str = "local.";

pub const STATUS_FLAGS_KEY: &str = "sf";
pub const CATEGORY_KEY: &str = "ci";
pub const PROTOCOL_VERSION_KEY: &str = "pv";
pub const CONFIG_NUMBER_KEY: &str = "c#";
pub const DEVICE_ID_KEY: &str = "id";

const STATUS_FLAGS_RANGE: std::ops::RangeInclusive<i64> = 0..=255;
const CATEGORY_RANGE: std::ops::RangeInclusive<i64> = 1..=32;
const PROTOCOL_VERSION_RANGE: std::ops::RangeInclusive<f64> = 0.0..=100.0;
const CONFIG_NUMBER_RANGE: std::ops::RangeInclusive<i64> = 0..=1_000_000;

/// Domain, service type and name gate.
pub fn is_acceptable_discovery_result(name: &str, service_type: &str, domain: &str) -> bool {
    check_discovery_result(name, service_type, domain).is_ok()
}

/// Same gate as [`is_acceptable_discovery_result`], naming the failed check.
pub fn check_discovery_result(
    name: &str,
    service_type: &str,
    domain: &str,
) -> Result<ServiceType, RejectReason> {
    if domain != LOCAL_DOMAIN {
        tracing::debug!(domain = %domain, "rejected non-local domain");
        return Err(RejectReason::ForeignDomain);
    }

    let service_type = ServiceType::parse(service_type).ok_or_else(|| {
        tracing::debug!(service_type = %service_type, "rejected unsupported service type");
        RejectReason::UnsupportedServiceType
    })?;

    let name_len = name.chars().count();
    if !(1..=MAX_NAME_LENGTH).contains(&name_len) {
        tracing::debug!(name_len, "rejected name length");
        return Err(RejectReason::InvalidName);
    }

    Ok(service_type)
}

/// Structural gate plus protocol range checks on present attributes.
pub fn is_acceptable_attribute_set(attributes: &AttributeMap) -> bool {
    if !validate_attribute_set(attributes) {
        return false;
    }

    if let Some(value) = attribute_text(attributes, STATUS_FLAGS_KEY) {
        if !integer_in(value, &STATUS_FLAGS_RANGE) {
            tracing::warn!(key = STATUS_FLAGS_KEY, value = ?value, "status flags out of range");
            return false;
        }
    }

    if let Some(value) = attribute_text(attributes, CATEGORY_KEY) {
        if !integer_in(value, &CATEGORY_RANGE) {
            tracing::warn!(key = CATEGORY_KEY, value = ?value, "category out of range");
            return false;
        }
    }

    if let Some(Some(value)) = attribute_text(attributes, PROTOCOL_VERSION_KEY) {
        if let Some(version) = parse_number(value) {
            if !PROTOCOL_VERSION_RANGE.contains(&version) {
                tracing::warn!(key = PROTOCOL_VERSION_KEY, version, "protocol version out of range");
                return false;
            }
        }
    }

    if let Some(Some(value)) = attribute_text(attributes, CONFIG_NUMBER_KEY) {
        if let Ok(config) = value.parse::<i64>() {
            if !CONFIG_NUMBER_RANGE.contains(&config) {
                tracing::warn!(key = CONFIG_NUMBER_KEY, config, "config number out of range");
                return false;
            }
        }
    }

    if let Some(id) = attribute_text(attributes, DEVICE_ID_KEY) {
        if !id.map_or(false, is_valid_device_id) {
            // Vendors vary; logged only.
            tracing::debug!(key = DEVICE_ID_KEY, "device id is neither MAC nor UUID");
        }
    }

    true
}

/// `XX:XX:XX:XX:XX:XX` hex pairs, or any UUID form.
pub fn is_valid_device_id(id: &str) -> bool {
    is_mac_address(id) || uuid::Uuid::parse_str(id).is_ok()
}

fn is_mac_address(text: &str) -> bool {
    let pairs: Vec<&str> = text.split(':').collect();
    pairs.len() == 6
        && pairs
            .iter()
            .all(|pair| pair.len() == 2 && pair.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Outer `None`: absent. Inner `None`: present but not UTF-8.
fn attribute_text<'a>(attributes: &'a AttributeMap, key: &str) -> Option<Option<&'a str>> {
    attributes.get(key).map(|value| value.as_text())
}

fn integer_in(value: Option<&str>, range: &std::ops::RangeInclusive<i64>) -> bool {
    value
        .and_then(|text| text.parse::<i64>().ok())
        .map_or(false, |number| range.contains(&number))
}

fn parse_number(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|number| number.is_finite())
}
