//! Tests for layered configuration loading.

use std::path::PathBuf;

use capmap_core::config::{CapmapConfig, ConfigOverrides};
use capmap_core::errors::ConfigError;

#[test]
fn test_missing_project_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = CapmapConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.cache.pillar_ttl_secs, 300);
    assert_eq!(config.projection.max_follow_up_events, 256);
}

#[test]
fn test_project_file_then_overrides() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("capmap.toml"),
        "[storage]\nread_pool_size = 2\n\n[cache]\npillar_ttl_secs = 60\n",
    )
    .unwrap();

    let config = CapmapConfig::load(dir.path(), None).unwrap();
    assert_eq!(config.storage.read_pool_size, 2);
    assert_eq!(config.cache.pillar_ttl_secs, 60);

    let overrides = ConfigOverrides {
        db_path: Some(PathBuf::from("/var/lib/capmap/capmap.db")),
        read_pool_size: Some(6),
        pillar_ttl_secs: None,
    };
    let config = CapmapConfig::load(dir.path(), Some(&overrides)).unwrap();
    assert_eq!(config.storage.read_pool_size, 6);
    assert_eq!(config.cache.pillar_ttl_secs, 60);
    assert_eq!(
        config.storage.db_path.as_deref(),
        Some(std::path::Path::new("/var/lib/capmap/capmap.db"))
    );
}

#[test]
fn test_invalid_project_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("capmap.toml"), "[storage]\nread_pool_size = 0\n").unwrap();
    let err = CapmapConfig::load(dir.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}
