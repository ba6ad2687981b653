//! Common enumerations used by the logger.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use crate::errors::{LogError, Result};

const UNKNOWN_NAME: &str = "unknown";
const UNKNOWN_DISPLAY_NAME: &str = "UNKNOWN";

/// Severity of a log entry, ordered from least to most important.
///
/// An emitter configured with a minimum severity `S` writes an entry of
/// severity `L` iff `L >= S`. `Fatal` is always written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    /// Detailed debugging information
    Debug = 0,
    /// Informational messages
    Info = 1,
    /// Warning messages
    Warn = 2,
    /// Error messages
    Error = 3,
    /// Unrecoverable errors; the emitter terminates the process after writing
    Fatal = 4,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    /// Parse a configured minimum severity.
    ///
    /// Matching is case-insensitive and `warning` is accepted as an alias for
    /// `warn`. `fatal` is not a valid minimum: it would silence every
    /// non-terminal entry.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::UnknownSeverity`] for any other input, including
    /// the empty string.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            _ => Err(LogError::UnknownSeverity(name.to_string())),
        }
    }

    /// Canonical lowercase name (`debug`, `info`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }

    /// Uppercase form used by the text format (`DEBUG`, `INFO`, ...).
    pub fn display_name(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Convert a raw numeric severity.
    pub const fn from_repr(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Severity::Debug),
            1 => Some(Severity::Info),
            2 => Some(Severity::Warn),
            3 => Some(Severity::Error),
            4 => Some(Severity::Fatal),
            _ => None,
        }
    }

    /// Lowercase name of a raw numeric severity, `unknown` when out of range.
    pub fn name_of(raw: u8) -> &'static str {
        Self::from_repr(raw).map_or(UNKNOWN_NAME, |s| s.name())
    }

    /// Uppercase name of a raw numeric severity, `UNKNOWN` when out of range.
    pub fn display_name_of(raw: u8) -> &'static str {
        Self::from_repr(raw).map_or(UNKNOWN_DISPLAY_NAME, |s| s.display_name())
    }

    /// Whether an emitter with this minimum writes an entry of `severity`.
    pub fn enables(&self, severity: Severity) -> bool {
        severity == Severity::Fatal || severity >= *self
    }
}

impl FromStr for Severity {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self> {
        Severity::parse(s)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `[HH:MM:SS.mmm] LEVEL: message | key=value`
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Selector string as it appears in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = LogError;

    /// Format selectors are matched exactly, unlike severities.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(LogError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_severity() {
        let cases = [
            ("debug", Severity::Debug),
            ("info", Severity::Info),
            ("warn", Severity::Warn),
            ("warning", Severity::Warn),
            ("error", Severity::Error),
            ("DEBUG", Severity::Debug),
            ("Info", Severity::Info),
            ("WARNING", Severity::Warn),
        ];
        for (input, want) in cases {
            assert_eq!(Severity::parse(input).unwrap(), want, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_severity_rejects_unknown() {
        for input in ["", "invalid", "fatal", "trace", " info", "warnings"] {
            let err = Severity::parse(input).unwrap_err();
            assert!(matches!(err, LogError::UnknownSeverity(ref s) if s == input));
        }
    }

    #[test]
    fn test_names() {
        let names: Vec<_> = Severity::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(names, ["debug", "info", "warn", "error", "fatal"]);
        let upper: Vec<_> = Severity::ALL.iter().map(|s| s.display_name()).collect();
        assert_eq!(upper, ["DEBUG", "INFO", "WARN", "ERROR", "FATAL"]);
    }

    #[test]
    fn test_out_of_range_renders_unknown() {
        assert_eq!(Severity::name_of(99), "unknown");
        assert_eq!(Severity::display_name_of(99), "UNKNOWN");
        assert_eq!(Severity::name_of(Severity::Warn as u8), "warn");
        assert_eq!(Severity::display_name_of(4), "FATAL");
    }

    #[test]
    fn test_fatal_always_enabled() {
        for min in Severity::ALL {
            assert!(min.enables(Severity::Fatal));
        }
        assert!(!Severity::Error.enables(Severity::Warn));
        assert!(Severity::Debug.enables(Severity::Debug));
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!(matches!(
            "yaml".parse::<LogFormat>(),
            Err(LogError::UnknownFormat(_))
        ));
    }

    proptest! {
        #[test]
        fn parse_is_case_insensitive(idx in 0usize..4, mask in proptest::collection::vec(any::<bool>(), 7)) {
            let names = ["debug", "info", "warn", "error"];
            let name = names[idx];
            let mixed: String = name
                .chars()
                .zip(mask.iter().cycle())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(Severity::parse(&mixed).unwrap(), Severity::ALL[idx]);
        }

        #[test]
        fn parse_rejects_non_level_strings(s in "[a-z]{0,12}") {
            prop_assume!(!["debug", "info", "warn", "warning", "error"].contains(&s.as_str()));
            prop_assert!(Severity::parse(&s).is_err());
        }

        #[test]
        fn filtering_is_ordered(min in 0u8..5, level in 0u8..5) {
            let min = Severity::from_repr(min).unwrap();
            let level = Severity::from_repr(level).unwrap();
            let expected = level >= min || level == Severity::Fatal;
            prop_assert_eq!(min.enables(level), expected);
        }
    }
}
