use crate::domain::{AnomalyThresholds, ConfigError, RateLimitConfig, TrustConfig};
use crate::ports::ConfigProvider;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// StaticConfigProvider - In-process configuration
// ============================================================================

/// Configuration fixed at construction. Defaults unless told otherwise.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: TrustConfig,
}

impl StaticConfigProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: TrustConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn trust_config(&self) -> TrustConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - File-based configuration
// ============================================================================

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    rate_limit: RateLimitSection,
    #[serde(default)]
    anomaly: AnomalySection,
}

#[derive(Debug, Deserialize, Default)]
struct RateLimitSection {
    max_announcements: Option<u32>,
    window_secs: Option<u64>,
    max_tracked_identities: Option<usize>,
    shard_count: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct AnomalySection {
    name_churn: Option<usize>,
    address_churn: Option<usize>,
    sparse_attribute_floor: Option<usize>,
    sensitive_ports: Option<Vec<u16>>,
}

/// Loads `TrustConfig` from TOML. Every field is optional.
///
/// # Config File Format
///
/// ```toml
/// [rate_limit]
/// max_announcements = 100
/// window_secs = 60
/// max_tracked_identities = 10000
/// shard_count = 16
///
/// [anomaly]
/// name_churn = 5
/// address_churn = 3
/// sparse_attribute_floor = 3
/// sensitive_ports = [22, 23, 3389, 5900]
/// ```
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    config: TrustConfig,
}

impl TomlConfigProvider {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let rate_defaults = RateLimitConfig::default();
        let rate_limit = RateLimitConfig {
            max_announcements: file
                .rate_limit
                .max_announcements
                .unwrap_or(rate_defaults.max_announcements),
            window: file
                .rate_limit
                .window_secs
                .map_or(rate_defaults.window, Duration::from_secs),
            max_tracked_identities: file
                .rate_limit
                .max_tracked_identities
                .unwrap_or(rate_defaults.max_tracked_identities),
            shard_count: file.rate_limit.shard_count.unwrap_or(rate_defaults.shard_count),
        };

        let anomaly_defaults = AnomalyThresholds::default();
        let anomaly = AnomalyThresholds {
            name_churn: file.anomaly.name_churn.unwrap_or(anomaly_defaults.name_churn),
            address_churn: file
                .anomaly
                .address_churn
                .unwrap_or(anomaly_defaults.address_churn),
            sparse_attribute_floor: file
                .anomaly
                .sparse_attribute_floor
                .unwrap_or(anomaly_defaults.sparse_attribute_floor),
            sensitive_ports: file
                .anomaly
                .sensitive_ports
                .unwrap_or(anomaly_defaults.sensitive_ports),
        };

        let config = TrustConfig {
            rate_limit,
            anomaly,
        };
        config.validate()?;

        tracing::debug!(
            max_announcements = config.rate_limit.max_announcements,
            window_secs = config.rate_limit.window.as_secs(),
            "trust config loaded"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn trust_config(&self) -> TrustConfig {
        self.config.clone()
    }
}

impl TrustConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        TomlConfigProvider::parse(content).map(|provider| provider.config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        TomlConfigProvider::load(path).map(|provider| provider.config)
    }
}
