//! # Driving Port (Inbound API)

use crate::domain::{
    AnomalyFinding, DeviceIdentity, DeviceObservation, DiscoveredDevice, DiscoveryRecord,
    RejectReason,
};

/// Result of pushing one record through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The record passed every gate. `findings` are advisory.
    Accepted {
        device: DiscoveredDevice,
        findings: Vec<AnomalyFinding>,
    },
    /// A validation gate refused the record.
    Rejected(RejectReason),
    /// The device exceeded its announcement budget for the current window.
    Throttled { identity: DeviceIdentity },
}

impl PipelineOutcome {
    /// The accepted device, if any.
    pub fn device(&self) -> Option<&DiscoveredDevice> {
        match self {
            Self::Accepted { device, .. } => Some(device),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Entry point for the discovery layer.
///
/// # Example
///
/// ```rust,ignore
/// fn on_announcement<P: TrustPipelineApi>(pipeline: &P, record: DiscoveryRecord) {
///     if let PipelineOutcome::Accepted { device, .. } = pipeline.evaluate(&record, &[]) {
///         publish(device);
///     }
/// }
/// ```
pub trait TrustPipelineApi: Send + Sync {
    /// Sanitize, validate, throttle and inspect one record.
    ///
    /// `history` is the caller's record of earlier sightings; it is only read.
    fn evaluate(&self, record: &DiscoveryRecord, history: &[DeviceObservation]) -> PipelineOutcome;

    /// Forget every rate window.
    fn reset_rate_limits(&self);
}
