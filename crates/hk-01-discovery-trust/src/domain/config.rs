//! # Trust Configuration
//!
//! Tunables for the rate limiter and anomaly detector. The defaults are the
//! production values; `TomlConfigProvider` overrides any subset of them.

use std::time::Duration;
use thiserror::Error;

/// Announcement rate limiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Announcements allowed per identity per window (default: 100)
    pub max_announcements: u32,
    /// Window length (default: 60 seconds)
    pub window: Duration,
    /// Identities tracked before least-recently-seen ones are evicted
    /// (default: 10_000, across all shards)
    pub max_tracked_identities: usize,
    /// Independent lock shards in the counter table (default: 16)
    pub shard_count: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_announcements: 100,
            window: Duration::from_secs(60),
            max_tracked_identities: 10_000,
            shard_count: 16,
        }
    }
}

impl RateLimitConfig {
    /// Small values for tests.
    pub fn for_testing() -> Self {
        Self {
            max_announcements: 3,
            window: Duration::from_secs(10),
            max_tracked_identities: 64,
            shard_count: 4,
        }
    }

    #[must_use]
    pub fn with_max_announcements(mut self, max: u32) -> Self {
        self.max_announcements = max;
        self
    }

    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn with_max_tracked_identities(mut self, max: usize) -> Self {
        self.max_tracked_identities = max;
        self
    }

    #[must_use]
    pub fn with_shard_count(mut self, shards: usize) -> Self {
        self.shard_count = shards;
        self
    }
}

/// Anomaly detector thresholds. Findings fire when a count is strictly
/// greater than its threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyThresholds {
    /// Distinct-name sightings tolerated on one address (default: 5)
    pub name_churn: usize,
    /// Distinct-address sightings tolerated for one name (default: 3)
    pub address_churn: usize,
    /// HomeKit attribute sets smaller than this are sparse (default: 3)
    pub sparse_attribute_floor: usize,
    /// Remote-access ports (default: 22, 23, 3389, 5900)
    pub sensitive_ports: Vec<u16>,
}

impl Default for AnomalyThresholds {
    fn default() -> Self {
        Self {
            name_churn: 5,
            address_churn: 3,
            sparse_attribute_floor: 3,
            sensitive_ports: vec![22, 23, 3389, 5900],
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustConfig {
    pub rate_limit: RateLimitConfig,
    pub anomaly: AnomalyThresholds,
}

impl TrustConfig {
    /// Reject values that would disable a defense outright.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.max_announcements == 0 {
            return Err(ConfigError::Invalid("rate_limit.max_announcements must be > 0"));
        }
        if self.rate_limit.window.is_zero() {
            return Err(ConfigError::Invalid("rate_limit.window_secs must be > 0"));
        }
        if self.rate_limit.shard_count == 0 {
            return Err(ConfigError::Invalid("rate_limit.shard_count must be > 0"));
        }
        if self.rate_limit.max_tracked_identities < self.rate_limit.shard_count {
            return Err(ConfigError::Invalid(
                "rate_limit.max_tracked_identities must be >= shard_count",
            ));
        }
        Ok(())
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is outside its allowed range.
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}
