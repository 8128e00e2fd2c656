//! Logging macros taking Rust `format!` arguments.
//!
//! The [`Logger`](crate::Logger) methods use printf-style templates; these
//! macros are the alternative for callers who prefer `{}` placeholders. The
//! body is rendered with `format!` and passed to
//! [`Logger::log_message`](crate::Logger::log_message).
//!
//! # Examples
//!
//! ```no_run
//! use rust_telegram_logger::prelude::*;
//! use rust_telegram_logger::{error, info};
//!
//! let logger = Logger::simple("api")?;
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let status = 503;
//! error!(logger, "Upstream returned {status}");
//! # Ok::<(), rust_telegram_logger::LoggerError>(())
//! ```

/// Log a message at an explicit level.
///
/// ```no_run
/// # use rust_telegram_logger::prelude::*;
/// # let logger = Logger::simple("api")?;
/// use rust_telegram_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// # Ok::<(), rust_telegram_logger::LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_message($level, &format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```no_run
/// # use rust_telegram_logger::prelude::*;
/// # let logger = Logger::simple("api")?;
/// use rust_telegram_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// # Ok::<(), rust_telegram_logger::LoggerError>(())
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// The logger's fatal handler runs once the message has been attempted; by
/// default it exits the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
