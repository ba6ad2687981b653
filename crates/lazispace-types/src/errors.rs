//! Error types for logger construction and emission.

use std::fmt;
use std::io;
use thiserror::Error;

/// The error type for lazispace logging operations.
///
/// Configuration-time variants (`UnknownSeverity`, `UnknownFormat`,
/// `NoOutputsEnabled`, `InvalidFileOutput`, `FileOpen`) are returned to the
/// caller building a logger. Emission-time variants (`SinkWrite`, `Marshal`)
/// are never returned from a logging call; emitters hand them to their
/// fallback diagnostic channel instead.
#[derive(Error, Debug)]
pub enum LogError {
    /// The configured minimum level is not a recognised severity name
    #[error("unknown log level: {0}")]
    UnknownSeverity(String),

    /// The configured format selector is neither `text` nor `json`
    #[error("unknown log format: {0}")]
    UnknownFormat(String),

    /// Neither console nor file output is enabled
    #[error("no log outputs enabled")]
    NoOutputsEnabled,

    /// The file output descriptor failed validation
    #[error("invalid file log configuration: {0}")]
    InvalidFileOutput(String),

    /// The rotating log file could not be opened
    #[error("failed to open log file {path}: {reason}")]
    FileOpen {
        /// Directory and filename that were requested
        path: String,
        /// Underlying reason reported by the file writer
        reason: String,
    },

    /// Writing one segment of an entry to the sink failed
    #[error("logger: failed to write {stage}: {source}")]
    SinkWrite {
        /// Which part of the entry was being written
        stage: WriteStage,
        /// The I/O error reported by the sink
        #[source]
        source: io::Error,
    },

    /// An entry could not be encoded as JSON
    #[error("logger: failed to marshal log entry: {0}")]
    Marshal(#[source] serde_json::Error),

    /// Configuration file could not be interpreted
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl LogError {
    /// Whether this error can only arise while building a logger.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LogError::UnknownSeverity(_)
                | LogError::UnknownFormat(_)
                | LogError::NoOutputsEnabled
                | LogError::InvalidFileOutput(_)
                | LogError::FileOpen { .. }
                | LogError::Config(_)
        )
    }
}

/// The segment of an entry being written when a sink failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteStage {
    /// `[HH:MM:SS.mmm] LEVEL: message`
    TextPrefix,
    /// The ` |` separator before fields
    TextSeparator,
    /// A single ` key=value` pair
    TextField,
    /// An encoded JSON object
    JsonData,
    /// The trailing newline
    Newline,
}

impl WriteStage {
    /// Fixed one-line message written to the fallback channel for this stage.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            WriteStage::TextPrefix => "logger: failed to write text log prefix\n",
            WriteStage::TextSeparator => "logger: failed to write text log separator\n",
            WriteStage::TextField => "logger: failed to write text log field\n",
            WriteStage::JsonData => "logger: failed to write log data\n",
            WriteStage::Newline => "logger: failed to write newline\n",
        }
    }
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStage::TextPrefix => write!(f, "text log prefix"),
            WriteStage::TextSeparator => write!(f, "text log separator"),
            WriteStage::TextField => write!(f, "text log field"),
            WriteStage::JsonData => write!(f, "log data"),
            WriteStage::Newline => write!(f, "newline"),
        }
    }
}

/// A specialized Result type for lazispace logging operations.
pub type Result<T> = std::result::Result<T, LogError>;

/// Helper macro to bail out with a LogError
///
/// # Example
///
/// ```ignore
/// if cfg.filename.is_empty() {
///     bail!(InvalidFileOutput, "filename cannot be empty");
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::LogError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::LogError::$variant(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_messages_match_sentinels() {
        assert!(LogError::UnknownSeverity("loud".into())
            .to_string()
            .contains("unknown log level"));
        assert!(LogError::UnknownFormat("xml".into())
            .to_string()
            .contains("unknown log format"));
        assert_eq!(
            LogError::NoOutputsEnabled.to_string(),
            "no log outputs enabled"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(LogError::NoOutputsEnabled.is_configuration());
        let write = LogError::SinkWrite {
            stage: WriteStage::Newline,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "closed"),
        };
        assert!(!write.is_configuration());
        assert!(write.to_string().contains("newline"));
    }

    #[test]
    fn test_fallback_messages_are_single_lines() {
        let stages = [
            WriteStage::TextPrefix,
            WriteStage::TextSeparator,
            WriteStage::TextField,
            WriteStage::JsonData,
            WriteStage::Newline,
        ];
        for stage in stages {
            let msg = stage.fallback_message();
            assert!(msg.starts_with("logger: "));
            assert_eq!(msg.matches('\n').count(), 1);
        }
    }
}
