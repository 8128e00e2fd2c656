//! Core logger types and traits

pub mod config;
pub mod delivery;
pub mod diagnostics;
pub mod error;
pub mod formatter;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod template;
pub mod timestamp;

pub use config::{
    exit_process, EnvProvider, FatalHandler, LoggerConfig, ProcessEnv, DEFAULT_QUEUE_CAPACITY,
};
pub use delivery::{QueueState, WORKER_THREAD_NAME};
pub use diagnostics::{DiagnosticSink, StderrSink};
pub use error::{ConfigError, LoggerError, Result};
pub use formatter::MessageFormatter;
pub use log_entry::PendingMessage;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use template::Arg;
pub use timestamp::TimestampFormat;
