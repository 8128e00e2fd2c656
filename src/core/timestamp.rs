//! Timestamp formatting utilities
//!
//! Timestamps are rendered from a configurable descriptor. Besides a few
//! fixed layouts, two free-form descriptors are supported: human patterns
//! such as `YYYY-MM-DD HH:mm:ss` and raw strftime strings such as
//! `%d/%b/%Y %H:%M`.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{self, Write};
use std::str::FromStr;

/// strftime layout used by [`TimestampFormat::Default`]
pub const DEFAULT_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Pattern tokens and their strftime equivalents, longest first
const PATTERN_TOKENS: [(&str, &str); 10] = [
    ("YYYY", "%Y"),
    ("SSS", "%3f"),
    ("YY", "%y"),
    ("MM", "%m"),
    ("DD", "%d"),
    ("HH", "%H"),
    ("hh", "%I"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("A", "%p"),
];

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_telegram_logger::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
///
/// assert_eq!(TimestampFormat::default().format(&at), "2025-01-08 10:30:45");
/// assert_eq!(TimestampFormat::pattern("DD.MM.YYYY").format(&at), "08.01.2025");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45`
    #[default]
    Default,

    /// ISO 8601 with milliseconds and offset: `2025-01-08T10:30:45.123+00:00`
    Iso8601,

    /// RFC 3339: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Human pattern built from `YYYY YY MM DD HH hh mm ss SSS A` tokens.
    ///
    /// Any other character is copied through literally.
    Pattern(String),

    /// Raw strftime format string
    Strftime(String),
}

impl TimestampFormat {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        TimestampFormat::Pattern(pattern.into())
    }

    pub fn strftime(format: impl Into<String>) -> Self {
        TimestampFormat::Strftime(format.into())
    }

    /// Format a timestamp according to this format.
    ///
    /// Never panics: an invalid strftime string falls back to the default
    /// layout with a `%!(BADTIME)` marker appended.
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self {
            TimestampFormat::Default => format_layout(datetime, DEFAULT_LAYOUT),
            TimestampFormat::Iso8601 => format_layout(datetime, "%Y-%m-%dT%H:%M:%S%.3f%:z"),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::Pattern(pattern) => {
                format_layout(datetime, &pattern_to_strftime(pattern))
            }
            TimestampFormat::Strftime(layout) => format_layout(datetime, layout),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = Infallible;

    /// Interpret a descriptor string, as read from `TELEGRAM_TIME_FORMAT`.
    ///
    /// Named layouts (`default`, `iso8601`, `rfc3339`, `unix`) are matched
    /// case-insensitively; strings containing `%` are strftime; everything
    /// else is a pattern.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.to_lowercase().as_str() {
            "default" => TimestampFormat::Default,
            "iso8601" => TimestampFormat::Iso8601,
            "rfc3339" => TimestampFormat::Rfc3339,
            "unix" => TimestampFormat::Unix,
            _ if s.contains('%') => TimestampFormat::Strftime(s.to_string()),
            _ => TimestampFormat::Pattern(s.to_string()),
        };
        Ok(format)
    }
}

/// Translate a `YYYY-MM-DD HH:mm:ss` style pattern into strftime
pub fn pattern_to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'scan: while !rest.is_empty() {
        for (token, spec) in PATTERN_TOKENS {
            if let Some(tail) = rest.strip_prefix(token) {
                out.push_str(spec);
                rest = tail;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        match chars.next() {
            Some('%') => out.push_str("%%"),
            Some(c) => out.push(c),
            None => break,
        }
        rest = chars.as_str();
    }

    out
}

fn format_layout<Tz>(datetime: &DateTime<Tz>, layout: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    if write!(out, "{}", datetime.format(layout)).is_err() {
        out.clear();
        let _ = write!(out, "{}", datetime.format(DEFAULT_LAYOUT));
        out.push_str("%!(BADTIME)");
    }
    out
}
