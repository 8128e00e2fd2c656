//! # Rust Telegram Logger
//!
//! A lightweight logger that forwards application log messages to a Telegram
//! chat through the Bot API.
//!
//! ## Features
//!
//! - **Severity filtering**: Debug, Info, Warning, Error and Fatal
//! - **Non-blocking delivery**: a bounded queue drained by one background
//!   worker, with an explicit drain on close
//! - **Synchronous mode**: deliver on the calling thread instead
//! - **Formatting**: printf-style templates, configurable timestamps and
//!   optional HTML emphasis
//! - **Pluggable transport**: TLS policy or the whole HTTPS client can be
//!   replaced
//! - **`log` integration** (feature `log-bridge`)
//!
//! ## Example
//!
//! ```no_run
//! use rust_telegram_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .bot_token("123456:ABC")
//!     .chat_id("-1001234567890")
//!     .app_name("billing")
//!     .build()?;
//!
//! logger.info("invoice %d sent to %s", &[Arg::from(1042), Arg::from("acme")]);
//! logger.close();
//! # Ok::<(), rust_telegram_logger::LoggerError>(())
//! ```

#[cfg(feature = "log-bridge")]
pub mod bridge;
pub mod core;
pub mod macros;
pub mod transport;

pub mod prelude {
    pub use crate::core::{
        Arg, ConfigError, DiagnosticSink, EnvProvider, LogLevel, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, MessageFormatter, Result, TimestampFormat,
    };
    pub use crate::transport::{HttpTransport, TlsPolicy, TlsVersion, TransportError};
}

pub use core::{
    Arg, ConfigError, DiagnosticSink, EnvProvider, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, MessageFormatter, ProcessEnv, QueueState, Result, StderrSink,
    TimestampFormat,
};
pub use transport::{HttpTransport, TlsPolicy, TlsVersion, TransportError, UreqTransport};
