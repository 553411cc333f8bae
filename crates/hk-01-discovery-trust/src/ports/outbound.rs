//! # Driven Ports (Outbound SPI)

use crate::domain::{Timestamp, TrustConfig};

/// Abstract clock for time-dependent decisions.
///
/// Production uses `SystemTimeSource`; tests use `FixedTimeSource`.
pub trait TimeSource: Send + Sync {
    /// Current time in milliseconds since the epoch.
    fn now(&self) -> Timestamp;
}

/// Per-identity announcement budget.
///
/// # Thread Safety
///
/// `check_rate_limit` is called from any thread. For a single key the
/// read-decide-update sequence must be atomic: two concurrent calls for the
/// same key never both observe the same count.
pub trait RateLimiter: Send + Sync {
    /// Count one announcement for `key` and return whether it is allowed.
    ///
    /// A denied announcement does not consume budget.
    fn check_rate_limit(&self, key: &str) -> bool;

    /// Drop all tracked windows.
    fn reset(&self);
}

/// Source of pipeline configuration.
pub trait ConfigProvider: Send + Sync {
    fn trust_config(&self) -> TrustConfig;
}
