//! Reporting of delivery failures
//!
//! A failed delivery never reaches the caller of `log()`. It is handed to a
//! [`DiagnosticSink`] instead; the default sink writes one line to stderr.

use super::log_level::LogLevel;
use crate::transport::TransportError;

#[cfg(feature = "console")]
use colored::Colorize;

const ERROR_PREFIX: &str = "[TELEGRAM LOGGER ERROR]";
const CRITICAL_PREFIX: &str = "[TELEGRAM LOGGER CRITICAL]";

/// Receiver of per-delivery failures
///
/// Called from the worker thread in async mode and from the logging thread in
/// sync mode, so implementations must be thread-safe and should return
/// quickly.
pub trait DiagnosticSink: Send + Sync {
    /// A delivery attempt for a message of `level` failed
    fn delivery_failed(&self, level: LogLevel, error: &TransportError);

    /// A delivery attempt panicked; the logger keeps running
    fn delivery_panicked(&self, level: LogLevel, message: &str) {
        let _ = (level, message);
    }
}

/// Writes failures to standard error
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl StderrSink {
    fn prefix(critical: bool) -> String {
        let prefix = if critical { CRITICAL_PREFIX } else { ERROR_PREFIX };

        #[cfg(feature = "console")]
        let prefix = if critical {
            prefix.red().bold()
        } else {
            prefix.red()
        }
        .to_string();

        #[cfg(not(feature = "console"))]
        let prefix = prefix.to_string();

        prefix
    }
}

impl DiagnosticSink for StderrSink {
    fn delivery_failed(&self, level: LogLevel, error: &TransportError) {
        eprintln!(
            "{} Failed to deliver {} message: {}",
            Self::prefix(false),
            level,
            error
        );
    }

    fn delivery_panicked(&self, level: LogLevel, message: &str) {
        eprintln!(
            "{} Delivery of {} message panicked: {}. Logger continues to function.",
            Self::prefix(true),
            level,
            message
        );
    }
}

/// Text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Collecting {
        failures: Mutex<Vec<(LogLevel, TransportError)>>,
    }

    impl DiagnosticSink for Collecting {
        fn delivery_failed(&self, level: LogLevel, error: &TransportError) {
            self.failures.lock().push((level, error.clone()));
        }
    }

    #[test]
    fn test_custom_sink_receives_failures() {
        let sink = Collecting::default();
        sink.delivery_failed(LogLevel::Error, &TransportError::RemoteRejected { status: 500 });
        // Default panic hook is a no-op
        sink.delivery_panicked(LogLevel::Error, "boom");

        let failures = sink.failures.lock();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, LogLevel::Error);
    }

    #[test]
    fn test_stderr_sink_does_not_panic() {
        let sink = StderrSink;
        sink.delivery_failed(LogLevel::Info, &TransportError::unreachable("timed out"));
        sink.delivery_panicked(LogLevel::Fatal, "boom");
    }

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("static message")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload = std::panic::catch_unwind(|| panic!("formatted {}", 42)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 42");
    }
}
