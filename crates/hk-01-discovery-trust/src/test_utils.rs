//! Test utilities for the trust pipeline.
//!
//! Enable with the `test-utils` feature flag.
//!
//! ```rust,ignore
//! use hk_01_discovery_trust::test_utils::FixedTimeSource;
//! use hk_01_discovery_trust::TimeSource;
//! use std::time::Duration;
//!
//! let clock = FixedTimeSource::from_secs(1000);
//! clock.advance(Duration::from_secs(61));
//! assert_eq!(clock.now().as_millis(), 1_061_000);
//! ```

use crate::domain::Timestamp;
use crate::ports::outbound::TimeSource;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// A clock that only moves when told to.
///
/// Shared by reference (usually behind an `Arc`) between a test and the
/// component under test.
#[derive(Debug, Default)]
pub struct FixedTimeSource {
    millis: AtomicU64,
}

impl FixedTimeSource {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: AtomicU64::new(millis),
        }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(secs.saturating_mul(1000))
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        let step = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(step, Ordering::SeqCst);
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.millis.load(Ordering::SeqCst))
    }
}
