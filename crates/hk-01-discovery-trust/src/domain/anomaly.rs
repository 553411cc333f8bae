//! # Anomaly Detector
//!
//! Compares one sighting against caller-supplied history and flags patterns
//! consistent with spoofing or instability. Findings are advisory: nothing
//! here rejects a device or touches the history.

use super::config::AnomalyThresholds;
use super::entities::DeviceObservation;
use std::fmt;

/// HTTP and HTTPS, the only low ports a smart-home device is expected to use.
const WELL_KNOWN_WEB_PORTS: [u16; 2] = [80, 443];

/// Ports below this are privileged.
const PRIVILEGED_PORT_LIMIT: u16 = 1024;

/// One suspicious pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnomalyFinding {
    /// Many different names announced from the same address.
    NameChurn { count: usize },
    /// The same name announced from many different addresses.
    AddressChurn { count: usize },
    /// A remote-access service port.
    SuspiciousPort { port: u16 },
    /// A privileged port other than HTTP/HTTPS.
    LowPrivilegedPort { port: u16 },
    /// A HomeKit device advertising fewer attributes than any real accessory.
    SparseAttributes { count: usize },
}

impl fmt::Display for AnomalyFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameChurn { count } => {
                write!(f, "name churn from same address ({count} other names)")
            }
            Self::AddressChurn { count } => {
                write!(f, "address churn for same name ({count} other addresses)")
            }
            Self::SuspiciousPort { port } => write!(f, "suspicious privileged port {port}"),
            Self::LowPrivilegedPort { port } => write!(f, "low privileged port in use ({port})"),
            Self::SparseAttributes { count } => {
                write!(f, "unusually sparse attribute set ({count} attributes)")
            }
        }
    }
}

/// Evaluate `candidate` against `history` with the given thresholds.
pub fn find_anomalies(
    candidate: &DeviceObservation,
    history: &[DeviceObservation],
    thresholds: &AnomalyThresholds,
) -> Vec<AnomalyFinding> {
    let mut findings = Vec::new();

    let host = candidate.host.as_deref();

    if let Some(host) = host {
        let other_names = history
            .iter()
            .filter(|seen| seen.host.as_deref() == Some(host) && seen.name != candidate.name)
            .count();
        if other_names > thresholds.name_churn {
            findings.push(AnomalyFinding::NameChurn { count: other_names });
        }
    }

    // A hostless candidate differs from every hosted sighting.
    let other_hosts = history
        .iter()
        .filter(|seen| {
            seen.name == candidate.name
                && seen.host.as_deref().map_or(false, |seen_host| Some(seen_host) != host)
        })
        .count();
    if other_hosts > thresholds.address_churn {
        findings.push(AnomalyFinding::AddressChurn { count: other_hosts });
    }

    if let Some(port) = candidate.port {
        if thresholds.sensitive_ports.contains(&port) {
            findings.push(AnomalyFinding::SuspiciousPort { port });
        }
        if port < PRIVILEGED_PORT_LIMIT && !WELL_KNOWN_WEB_PORTS.contains(&port) {
            findings.push(AnomalyFinding::LowPrivilegedPort { port });
        }
    }

    if candidate.service_type.is_homekit()
        && candidate.attribute_count < thresholds.sparse_attribute_floor
    {
        findings.push(AnomalyFinding::SparseAttributes {
            count: candidate.attribute_count,
        });
    }

    for finding in &findings {
        tracing::warn!(device = %candidate.name, %finding, "anomaly detected");
    }

    findings
}

/// [`find_anomalies`] with the default thresholds.
pub fn find_anomalies_default(
    candidate: &DeviceObservation,
    history: &[DeviceObservation],
) -> Vec<AnomalyFinding> {
    find_anomalies(candidate, history, &AnomalyThresholds::default())
}
