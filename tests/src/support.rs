//! Fixtures shared by the integration flows and benchmarks.

use hk_01_discovery_trust::DiscoveryRecord;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Route `tracing` output through the test harness. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        // Another harness may have installed a subscriber already.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A well-formed HomeKit accessory announcement.
pub fn homekit_record(name: &str, host: &str) -> DiscoveryRecord {
    DiscoveryRecord::new(name, "_hap._tcp", "local.")
        .with_endpoint(host, 8080)
        .with_attribute("ff", "0")
        .with_attribute("id", "1A:2B:3C:4D:5E:6F")
        .with_attribute("md", "Eve Energy")
        .with_attribute("pv", "1.1")
        .with_attribute("sf", "1")
        .with_attribute("ci", "7")
}

/// A Matter device in commissioning mode.
pub fn matter_record(name: &str, host: &str) -> DiscoveryRecord {
    DiscoveryRecord::new(name, "_matterc._udp", "local.")
        .with_endpoint(host, 5540)
        .with_attribute("D", "3840")
        .with_attribute("VP", "65521+32769")
        .with_attribute("CM", "1")
}
