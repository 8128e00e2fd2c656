//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Default)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warning = 2,
    Error = 3,
    Fatal = 4,
}

impl LogLevel {
    /// All levels in ascending order
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Emoji shown in front of the level badge
    pub fn icon(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\u{1F50D}",
            LogLevel::Info => "\u{2139}\u{FE0F}",
            LogLevel::Warning => "\u{26A0}\u{FE0F}",
            LogLevel::Error => "\u{274C}",
            LogLevel::Fatal => "\u{1F480}",
        }
    }

    /// Warning and above get bold emphasis when colors are enabled
    pub fn is_emphasized(&self) -> bool {
        *self >= LogLevel::Warning
    }

    /// Parse a level name, falling back to `Info` for anything unrecognized.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unknown input is never an error: a misspelled `TELEGRAM_LOG_LEVEL`
    /// keeps the logger working at the default threshold.
    ///
    /// ```
    /// use rust_telegram_logger::LogLevel;
    ///
    /// assert_eq!(LogLevel::from_str_lenient("WARN"), LogLevel::Warning);
    /// assert_eq!(LogLevel::from_str_lenient("verbose"), LogLevel::Info);
    /// ```
    pub fn from_str_lenient(s: &str) -> Self {
        s.parse().unwrap_or(LogLevel::Info)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "fatal" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(feature = "log-bridge")]
impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => LogLevel::Debug,
            log::Level::Info => LogLevel::Info,
            log::Level::Warn => LogLevel::Warning,
            log::Level::Error => LogLevel::Error,
        }
    }
}
