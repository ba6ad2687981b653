//! Logger configuration types.
//!
//! These are the values a configuration loader hands to the logger factory.
//! Key names match the application's YAML layout:
//!
//! ```yaml
//! log:
//!   level: info
//!   format: text
//!   console:
//!     enabled: true
//!   file:
//!     enabled: true
//!     path: /var/log/lazispace
//!     filename: lazispace.log
//!     maxSizeMB: 10
//!     maxBackups: 3
//!     maxAgeDays: 7
//!     compress: false
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::errors::{LogError, Result};
use crate::LogFormat;

/// Logging configuration.
///
/// `level` and `format` are kept as the raw configured strings; the logger
/// factory parses them and reports unknown values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum severity: `debug`, `info`, `warn` (or `warning`), `error`
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format: `text` or `json`
    #[serde(default = "default_format")]
    pub format: String,
    /// Console output
    #[serde(default)]
    pub console: ConsoleConfig,
    /// Rotating file output
    #[serde(default)]
    pub file: FileLogConfig,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    LogFormat::Text.as_str().to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            console: ConsoleConfig { enabled: true },
            file: FileLogConfig::default(),
        }
    }
}

const SECTION_KEY: &str = "log";

impl LogConfig {
    /// Parse a YAML document, accepting either a top-level `log:` section
    /// or the bare logger settings.
    ///
    /// When a `log:` section is present, errors inside it are reported
    /// rather than retried as bare settings.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let parse_err =
            |e: serde_yaml::Error| LogError::Config(format!("Failed to parse log config: {}", e));

        let mut document: serde_yaml::Value = serde_yaml::from_str(content).map_err(parse_err)?;
        let section = match document.as_mapping_mut() {
            Some(map) => map.remove(SECTION_KEY),
            None => None,
        };
        match section {
            Some(section) => serde_yaml::from_value(section).map_err(parse_err),
            None => serde_yaml::from_value(document).map_err(parse_err),
        }
    }

    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            LogError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Full path of the active log file, or `None` when file output is off.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        if !self.file.enabled {
            return None;
        }
        Some(self.file.file_path())
    }
}

/// Console (stdout) output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Whether entries are written to stdout
    #[serde(default)]
    pub enabled: bool,
}

/// File output configuration.
///
/// The log file is always `path/filename`; the rotation thresholds are left
/// to external rotation tooling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLogConfig {
    /// Whether entries are written to a file
    #[serde(default)]
    pub enabled: bool,
    /// Directory holding the log file
    #[serde(default)]
    pub path: PathBuf,
    /// Log file name, e.g. `lazispace.log`
    #[serde(default)]
    pub filename: String,
    /// Size in megabytes at which the file is rotated; must be positive
    #[serde(default, rename = "maxSizeMB")]
    pub max_size_mb: u64,
    /// Rotated files to keep; 0 keeps only the current file
    #[serde(default, rename = "maxBackups")]
    pub max_backups: u32,
    /// Days to keep rotated files; 0 disables age-based removal
    #[serde(default, rename = "maxAgeDays")]
    pub max_age_days: u32,
    /// Whether rotated files are gzip-compressed
    #[serde(default)]
    pub compress: bool,
}

impl FileLogConfig {
    /// `path/filename`.
    pub fn file_path(&self) -> PathBuf {
        self.path.join(&self.filename)
    }

    /// Validate the descriptor of an enabled file output.
    ///
    /// Disabled outputs always validate.
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        if self.max_size_mb == 0 {
            crate::bail!(
                InvalidFileOutput,
                "log file maxSizeMB must be positive: got {}",
                self.max_size_mb
            );
        }
        if self.filename.is_empty() {
            crate::bail!(InvalidFileOutput, "log file filename cannot be empty");
        }
        Ok(())
    }
}
