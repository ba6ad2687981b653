//! Timestamp formatting for log lines.

use chrono::{DateTime, Local, SecondsFormat, TimeZone};
use std::fmt::Display;

/// `HH:MM:SS.mmm`, used by the text format.
pub const CLOCK_FORMAT: &str = "%H:%M:%S%.3f";

/// Wall-clock time of day with millisecond precision.
pub fn clock<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    timestamp.format(CLOCK_FORMAT).to_string()
}

/// RFC 3339 timestamp with second precision (`Z` for UTC).
pub fn rfc3339<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current local time.
pub fn now() -> DateTime<Local> {
    Local::now()
}
