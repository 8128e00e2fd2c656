//! Integration with the [`log`] facade
//!
//! With the `log-bridge` feature a [`Logger`] implements [`log::Log`], so
//! `log::info!` and friends from any crate end up in the chat.
//!
//! ```no_run
//! let logger = rust_telegram_logger::Logger::simple("api")?;
//! let logger = rust_telegram_logger::bridge::init(logger)?;
//!
//! log::warn!("cache miss rate at {}%", 37);
//!
//! // Drain before exiting; the global logger is never dropped
//! logger.close();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::core::{delivery, LogLevel, Logger};
use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// Most verbose `log` filter that can still pass `level`
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Debug => LevelFilter::Trace,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Warning => LevelFilter::Warn,
        LogLevel::Error | LogLevel::Fatal => LevelFilter::Error,
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        LogLevel::from(metadata.level()) >= self.min_level()
    }

    fn log(&self, record: &Record<'_>) {
        // Records from the HTTP client while a message is in flight
        if delivery::is_delivering() {
            return;
        }
        if !self.enabled(record.metadata()) {
            self.metrics().record_filtered();
            return;
        }

        let level = LogLevel::from(record.level());
        match record.args().as_str() {
            Some(message) => self.log_message(level, message),
            None => self.log_message(level, &record.args().to_string()),
        }
    }

    fn flush(&self) {}
}

/// Install `logger` as the global `log` logger
///
/// The logger is leaked so it lives for the rest of the process; the
/// returned reference is the handle for [`Logger::close`] at shutdown.
///
/// # Errors
///
/// Fails if a global logger is already installed. `logger` is closed in
/// that case.
pub fn init(logger: Logger) -> Result<&'static Logger, SetLoggerError> {
    let max_level = level_filter(logger.min_level());
    let logger: &'static Logger = Box::leak(Box::new(logger));

    if let Err(e) = log::set_logger(logger) {
        logger.close();
        return Err(e);
    }
    log::set_max_level(max_level);
    Ok(logger)
}
