//! Log file output.

use lazispace_types::{FileLogConfig, LogError, Result};
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Open the log file described by `config`.
///
/// The live file is always `path/filename` and is appended to across
/// restarts. Size, age, backup and compression limits are carried in the
/// descriptor for external rotation tooling and are not acted on here.
///
/// # Errors
///
/// Returns [`LogError::FileOpen`] when the file cannot be created.
pub fn open_rotating(config: &FileLogConfig) -> Result<RollingFileAppender> {
    debug!(
        path = %config.file_path().display(),
        max_size_mb = config.max_size_mb,
        max_backups = config.max_backups,
        max_age_days = config.max_age_days,
        compress = config.compress,
        "opening log file"
    );

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(config.filename.clone())
        .build(&config.path)
        .map_err(|err| LogError::FileOpen {
            path: config.file_path().display().to_string(),
            reason: err.to_string(),
        })
}
