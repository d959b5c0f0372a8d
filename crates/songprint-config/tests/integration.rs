//! Integration tests for songprint-config file handling.

use songprint_config::{ConfigError, FileOp, RecognizerConfig};
use tempfile::TempDir;

#[test]
fn save_creates_parent_and_load_reads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = RecognizerConfig::default();
    config.workers = Some(3);
    config.context.altitude = -10;
    config.save(&path).unwrap();

    assert!(path.exists());
    assert_eq!(RecognizerConfig::load(&path).unwrap(), config);
}

#[test]
fn load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = RecognizerConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::File { op: FileOp::Read, .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn load_rejects_invalid_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "segment_duration_seconds = 0\n").unwrap();

    assert!(matches!(
        RecognizerConfig::load(&path),
        Err(ConfigError::Invalid {
            field: "segment_duration_seconds",
            ..
        })
    ));
}
