//! The process-wide registry behind the free functions.
//!
//! Kept to a single test: the registry is shared by everything in this
//! binary.

use lazispace_log::{
    debug, error, fatal, fields, global, info, init_bootstrap, upgrade_from_bootstrap, warn,
    ConsoleConfig, FileLogConfig, LogConfig, Phase,
};
use std::fs;
use tempfile::tempdir;

#[test]
fn global_lifecycle_writes_to_log_file() {
    assert_eq!(global().phase(), Phase::Uninitialized);

    // No emitter yet: dropped, and fatal does not terminate.
    info("dropped", &[]);
    fatal("dropped fatal", &[]);

    let buffer = init_bootstrap();
    assert_eq!(global().phase(), Phase::Bootstrap);
    warn("early warning", &fields!["attempt" => 1]);
    debug("early detail", &[]);

    let dir = tempdir().unwrap();
    let config = LogConfig {
        level: "info".to_string(),
        format: "text".to_string(),
        console: ConsoleConfig { enabled: false },
        file: FileLogConfig {
            enabled: true,
            path: dir.path().to_path_buf(),
            filename: "lazispace.log".to_string(),
            max_size_mb: 10,
            max_backups: 3,
            max_age_days: 7,
            compress: false,
        },
    };
    config.file.validate().unwrap();

    upgrade_from_bootstrap(&config, Some(&buffer)).unwrap();
    assert_eq!(global().phase(), Phase::Steady);
    error("after upgrade", &fields!["code" => 42]);

    let path = config.log_file_path().unwrap();
    let written = fs::read_to_string(path).unwrap();
    let lines: Vec<_> = written.lines().collect();

    assert!(!written.contains("dropped"));
    assert!(!written.contains("early detail"));
    assert_eq!(lines.len(), 4);
    assert!(lines[0].contains("WARN: early warning | bootstrap=true timestamp="));
    assert!(lines[0].ends_with(" attempt=1"));
    assert!(lines[1].contains("INFO: logger initialized successfully | bootstrap=true"));
    assert!(lines[1].ends_with(" level=info format=text"));
    assert!(lines[2].ends_with("INFO: upgraded from bootstrap logger | replayed_logs=5"));
    assert!(lines[3].ends_with("ERROR: after upgrade | code=42"));
}
