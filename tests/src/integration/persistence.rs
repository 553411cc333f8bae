//! Accepted devices -> SecureStore -> restart

#[cfg(test)]
mod tests {
    use crate::support::{homekit_record, init_tracing};
    use hk_01_discovery_trust::test_utils::FixedTimeSource;
    use hk_01_discovery_trust::{PipelineOutcome, TrustConfig, TrustPipeline, TrustPipelineApi};
    use hk_02_secure_store::{
        DirectoryLegacyStore, FileVault, LegacyStore, MigrationOutcome, SecureStore, StoreError,
        KEY_FILE_NAME,
    };
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::Arc;

    const NAMESPACE: &str = "com.example.adopter";
    const CONFIDENCE_KEY: &str = "confidence-cache";
    const NOTES_KEY: &str = "device-notes";

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct ConfidenceEntry {
        score: f64,
        findings: usize,
        last_seen_ms: u64,
    }

    fn open_store(dir: &Path) -> SecureStore<FileVault> {
        let vault = FileVault::open_with_key_file(dir).expect("vault opens");
        SecureStore::new(Arc::new(vault), NAMESPACE)
    }

    #[test]
    fn test_confidence_cache_survives_restart() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedTimeSource::from_secs(1_700_000_000));
        let pipeline = TrustPipeline::from_config(&TrustConfig::default(), clock);

        let mut cache = BTreeMap::new();
        for (name, host) in [("Eve Energy", "192.168.1.20"), ("Hue Bridge", "192.168.1.21")] {
            if let PipelineOutcome::Accepted { device, findings } =
                pipeline.evaluate(&homekit_record(name, host), &[])
            {
                cache.insert(
                    device.identity.to_string(),
                    ConfidenceEntry {
                        score: 1.0 - 0.1 * findings.len() as f64,
                        findings: findings.len(),
                        last_seen_ms: device.accepted_at.as_millis(),
                    },
                );
            }
        }
        assert_eq!(cache.len(), 2);

        open_store(dir.path()).store(&cache, CONFIDENCE_KEY).unwrap();

        let restored: Option<BTreeMap<String, ConfidenceEntry>> =
            open_store(dir.path()).retrieve(CONFIDENCE_KEY).unwrap();
        assert_eq!(restored, Some(cache));
        assert!(dir.path().join(KEY_FILE_NAME).exists());
    }

    #[test]
    fn test_accepted_device_serializes_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let clock = Arc::new(FixedTimeSource::from_secs(1_700_000_000));
        let pipeline = TrustPipeline::from_config(&TrustConfig::default(), clock);
        let store = open_store(dir.path());

        let record = homekit_record("Lamp<script>", "192.168.1.20");
        let device = pipeline.evaluate(&record, &[]).device().cloned().expect("accepted");
        store.store(&device, "last-device").unwrap();

        let raw: serde_json::Value = store.retrieve("last-device").unwrap().expect("present");
        assert_eq!(raw["name"], "Lamp>");
        assert_eq!(raw["service_type"], "_hap._tcp");
        assert_eq!(raw["identity"], "Lamp>|_hap._tcp");
    }

    #[test]
    fn test_legacy_notes_migrate_once() {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let legacy_dir = dir.path().join("legacy");
        std::fs::create_dir_all(&legacy_dir).unwrap();
        let legacy = DirectoryLegacyStore::new(&legacy_dir);

        let notes = vec!["replace battery".to_string(), "firmware 2.1".to_string()];
        std::fs::write(legacy.path_for("notes"), serde_json::to_vec(&notes).unwrap()).unwrap();

        let store = open_store(&dir.path().join("vault"));
        assert_eq!(
            store.migrate_legacy(&legacy, NOTES_KEY, "notes").unwrap(),
            MigrationOutcome::Migrated { legacy_removed: true }
        );
        assert_eq!(legacy.read_raw("notes").unwrap(), None);
        assert_eq!(store.retrieve::<Vec<String>>(NOTES_KEY).unwrap(), Some(notes.clone()));

        // A stale legacy file reappearing must not overwrite migrated data.
        std::fs::write(legacy.path_for("notes"), b"[\"stale\"]").unwrap();
        assert_eq!(
            store.migrate_legacy(&legacy, NOTES_KEY, "notes").unwrap(),
            MigrationOutcome::AlreadyPresent
        );
        assert_eq!(store.retrieve::<Vec<String>>(NOTES_KEY).unwrap(), Some(notes));
    }

    #[test]
    fn test_tampered_vault_is_backend_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.store_string("secret", "k").unwrap();

        let path = store.backend().namespace_path(NAMESPACE);
        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        std::fs::write(&path, bytes).unwrap();

        let err = open_store(dir.path()).retrieve_string("k").unwrap_err();
        assert!(matches!(err, StoreError::BackendFailure { .. }));
    }

    #[test]
    fn test_delete_all_then_restart() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(dir.path());
        store.store_string("a", "one").unwrap();
        store.store_string("b", "two").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["one", "two"]);

        store.delete_all().unwrap();
        assert!(open_store(dir.path()).keys().unwrap().is_empty());
    }
}
