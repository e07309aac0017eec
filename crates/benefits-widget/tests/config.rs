use std::path::PathBuf;

use benefits_widget::config::{
    load_config_from, save_config_to, StorageBackend, WidgetConfig, ENV_ANALYSIS_URL, ENV_BUCKET,
};

fn write(dir: &tempfile::TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn v0_config_gains_default_timeouts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        r#"{
            "analysis_base_url": "http://analysis.internal:8000",
            "storage": { "type": "s3", "region": "us-west-2", "bucket": "benefits-data" }
        }"#,
    );

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.config_version, 1);
    assert_eq!(config.analysis_timeout_secs, 60);
    assert_eq!(config.lookup_timeout_secs, 10);
    assert_eq!(config.history_timeout_secs, 10);
    assert_eq!(
        config.storage,
        StorageBackend::S3 {
            region: "us-west-2".to_string(),
            bucket: "benefits-data".to_string(),
        }
    );
}

#[test]
fn v0_migration_keeps_existing_timeouts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        r#"{
            "config_version": 0,
            "analysis_base_url": "http://localhost:8000",
            "analysis_timeout_secs": 5,
            "storage": { "type": "memory" }
        }"#,
    );

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.analysis_timeout_secs, 5);
    assert_eq!(config.lookup_timeout_secs, 10);
    assert_eq!(config.storage, StorageBackend::Memory { employees: vec![] });
}

#[test]
fn newer_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        r#"{ "config_version": 99, "analysis_base_url": "x", "storage": { "type": "memory" } }"#,
    );

    let err = load_config_from(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build"), "{err}");
}

#[test]
fn version_beyond_u32_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        r#"{ "config_version": 4294967297, "analysis_base_url": "x", "storage": { "type": "memory" } }"#,
    );

    let err = load_config_from(&path).unwrap_err();
    assert!(err.to_string().contains("newer than this build"), "{err}");
}

#[test]
fn non_object_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "[1, 2, 3]");
    assert!(load_config_from(&path).is_err());
}

#[test]
fn missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_config_from(&dir.path().join("absent.json")).is_err());
}

#[test]
fn save_stamps_version_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = WidgetConfig {
        config_version: 0,
        analysis_base_url: "http://analysis.internal:8000".to_string(),
        session_dir: Some(dir.path().join("session")),
        ..WidgetConfig::default()
    };
    save_config_to(&path, &config).unwrap();

    assert!(!path.with_extension("json.tmp").exists());
    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded.config_version, 1);
    assert_eq!(loaded.analysis_base_url, "http://analysis.internal:8000");
    assert_eq!(loaded.session_dir, config.session_dir);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn overrides_replace_url_and_bucket() {
    let mut config = WidgetConfig {
        storage: StorageBackend::S3 {
            region: "us-east-1".to_string(),
            bucket: "from-file".to_string(),
        },
        ..WidgetConfig::default()
    };

    config.apply_overrides(|name| match name {
        ENV_ANALYSIS_URL => Some("http://override:9000".to_string()),
        ENV_BUCKET => Some("from-env".to_string()),
        _ => None,
    });

    assert_eq!(config.analysis_base_url, "http://override:9000");
    assert_eq!(
        config.storage,
        StorageBackend::S3 {
            region: "us-east-1".to_string(),
            bucket: "from-env".to_string(),
        }
    );
}

#[test]
fn blank_overrides_are_ignored() {
    let mut config = WidgetConfig::default();
    let before = config.clone();

    config.apply_overrides(|_| Some("  ".to_string()));
    assert_eq!(config, before);

    // A bucket without an S3 backend has nothing to override.
    config.apply_overrides(|name| (name == ENV_BUCKET).then(|| "bucket".to_string()));
    assert_eq!(config, before);
}
