use markdesk_core::{init_logging, logging_status, AppConfig, LoggingError};
use std::path::Path;

#[test]
fn init_is_idempotent_and_rejects_reconfiguration() {
    let dir = tempfile::tempdir().expect("temp dir");
    let other = tempfile::tempdir().expect("second temp dir");

    let relative = init_logging("info", Path::new("logs/dev")).expect_err("relative dir");
    assert!(matches!(relative, LoggingError::InvalidDirectory(_)));
    assert!(logging_status().is_none());

    let config_path = dir.path().join("markdesk.json");
    std::fs::write(
        &config_path,
        format!(
            r#"{{"log_level": "INFO", "log_dir": {}}}"#,
            serde_json::to_string(&dir.path().join("logs")).expect("path json")
        ),
    )
    .expect("write config");
    let config = AppConfig::load(&config_path).expect("config should load");
    assert!(config.init_logging().expect("first init"));

    let log_dir = dir.path().join("logs");
    init_logging("info", &log_dir).expect("same config is idempotent");

    let level_conflict = init_logging("debug", &log_dir).expect_err("level change");
    assert!(matches!(level_conflict, LoggingError::Conflict(_)));

    let dir_conflict = init_logging("info", other.path()).expect_err("dir change");
    assert!(matches!(dir_conflict, LoggingError::Conflict(_)));

    let (level, active_dir) = logging_status().expect("logging active");
    assert_eq!(level, "info");
    assert_eq!(active_dir, log_dir);
    assert!(log_dir.is_dir());
}
