//! # Trust Pipeline Service
//!
//! Wires the domain gates to the rate limiter and clock ports.
//!
//! ## Flow
//!
//! ```text
//! DiscoveryRecord
//!   -> discovery-result gate   (reject: domain, service type, name length)
//!   -> attribute-set gate      (reject: structure, protocol ranges)
//!   -> sanitize name, host, port, attribute values
//!   -> derive identity
//!   -> rate limiter            (throttle)
//!   -> anomaly detector        (advisory findings)
//!   -> DiscoveredDevice
//! ```

use crate::adapters::{SystemTimeSource, WindowedRateLimiter};
use crate::domain::{
    check_discovery_result, find_anomalies, is_acceptable_attribute_set, is_valid_port,
    sanitize_address, sanitize_attribute, sanitize_name, AnomalyThresholds, DeviceIdentity,
    DeviceObservation, DiscoveredDevice, DiscoveryRecord, RejectReason, SanitizedText,
    ServiceType, TrustConfig,
};
use crate::ports::{ConfigProvider, PipelineOutcome, RateLimiter, TimeSource, TrustPipelineApi};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The trust pipeline.
///
/// ```rust
/// use hk_01_discovery_trust::{DiscoveryRecord, TrustConfig, TrustPipeline, TrustPipelineApi};
///
/// let pipeline = TrustPipeline::with_system_clock(&TrustConfig::default());
/// let record = DiscoveryRecord::new("Eve Energy", "_hap._tcp", "local.")
///     .with_endpoint("192.168.1.20", 8080)
///     .with_attribute("sf", "1")
///     .with_attribute("ci", "7")
///     .with_attribute("md", "Eve Energy");
///
/// assert!(pipeline.evaluate(&record, &[]).is_accepted());
/// ```
pub struct TrustPipeline<R: RateLimiter = WindowedRateLimiter> {
    rate_limiter: R,
    thresholds: AnomalyThresholds,
    time_source: Arc<dyn TimeSource>,
}

impl TrustPipeline<WindowedRateLimiter> {
    /// Build the production pipeline from configuration.
    pub fn from_config(config: &TrustConfig, time_source: Arc<dyn TimeSource>) -> Self {
        let rate_limiter = WindowedRateLimiter::new(&config.rate_limit, time_source.clone());
        Self::new(rate_limiter, config.anomaly.clone(), time_source)
    }

    /// Build the production pipeline from whatever `provider` currently holds.
    pub fn from_provider(provider: &dyn ConfigProvider, time_source: Arc<dyn TimeSource>) -> Self {
        Self::from_config(&provider.trust_config(), time_source)
    }

    pub fn with_system_clock(config: &TrustConfig) -> Self {
        Self::from_config(config, Arc::new(SystemTimeSource::new()))
    }
}

impl<R: RateLimiter> TrustPipeline<R> {
    pub fn new(rate_limiter: R, thresholds: AnomalyThresholds, time_source: Arc<dyn TimeSource>) -> Self {
        Self {
            rate_limiter,
            thresholds,
            time_source,
        }
    }

    pub fn rate_limiter(&self) -> &R {
        &self.rate_limiter
    }

    pub fn thresholds(&self) -> &AnomalyThresholds {
        &self.thresholds
    }

    /// Sanitize every free-text field of a record that passed validation.
    fn sanitize(&self, record: &DiscoveryRecord, service_type: ServiceType) -> DiscoveredDevice {
        let name = sanitize_name(&record.name);

        let host = record.host.as_deref().and_then(|raw| {
            let host = sanitize_address(raw);
            if host.is_none() {
                tracing::debug!(device = %name, "dropped invalid host");
            }
            host
        });

        let port = record.port.filter(|port| {
            let valid = is_valid_port(u32::from(*port));
            if !valid {
                tracing::debug!(device = %name, port, "dropped invalid port");
            }
            valid
        });

        let attributes: BTreeMap<String, SanitizedText> = record
            .attributes
            .iter()
            .map(|(key, value)| (key.clone(), sanitize_attribute(value)))
            .collect();

        DiscoveredDevice {
            identity: DeviceIdentity::derive(&name, service_type),
            name,
            service_type,
            domain: record.domain.clone(),
            host,
            port,
            attributes,
            accepted_at: self.time_source.now(),
        }
    }
}

impl<R: RateLimiter> TrustPipelineApi for TrustPipeline<R> {
    fn evaluate(&self, record: &DiscoveryRecord, history: &[DeviceObservation]) -> PipelineOutcome {
        let service_type =
            match check_discovery_result(&record.name, &record.service_type, &record.domain) {
                Ok(service_type) => service_type,
                Err(reason) => {
                    tracing::warn!(%reason, service_type = %record.service_type, "discovery result rejected");
                    return PipelineOutcome::Rejected(reason);
                }
            };

        if !is_acceptable_attribute_set(&record.attributes) {
            let reason = RejectReason::InvalidAttributes;
            tracing::warn!(%reason, %service_type, "attribute set rejected");
            return PipelineOutcome::Rejected(reason);
        }

        let device = self.sanitize(record, service_type);

        if !self.rate_limiter.check_rate_limit(device.identity.as_str()) {
            return PipelineOutcome::Throttled {
                identity: device.identity,
            };
        }

        let findings = find_anomalies(&device.observation(), history, &self.thresholds);

        tracing::info!(
            identity = %device.identity,
            host = ?device.host,
            port = ?device.port,
            findings = findings.len(),
            "device accepted"
        );

        PipelineOutcome::Accepted { device, findings }
    }

    fn reset_rate_limits(&self) {
        self.rate_limiter.reset();
    }
}
