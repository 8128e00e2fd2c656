//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Errors raised while building a [`Logger`](crate::Logger).
///
/// Per-message delivery failures are never returned to the caller; they are
/// reported as [`TransportError`](crate::transport::TransportError) values
/// through the configured diagnostic sink.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Configuration is incomplete or invalid
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The TLS connector could not be created from the requested policy
    #[error("TLS setup failed: {0}")]
    TlsSetup(String),

    /// The background delivery worker could not be started
    #[error("Failed to spawn delivery worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

/// Configuration problems detected at construction time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("bot token is required")]
    MissingBotToken,

    #[error("chat ID is required")]
    MissingChatId,

    /// A required environment variable is unset or empty
    #[error("{0} environment variable not set")]
    MissingEnv(String),

    #[error("queue capacity must be at least 1")]
    InvalidCapacity,
}

impl LoggerError {
    /// Create a TLS setup error
    pub fn tls_setup(message: impl Into<String>) -> Self {
        LoggerError::TlsSetup(message.into())
    }

    /// Create a missing environment variable error
    pub fn missing_env(key: impl Into<String>) -> Self {
        LoggerError::Config(ConfigError::MissingEnv(key.into()))
    }

    /// Whether this error was caused by bad configuration
    pub fn is_config(&self) -> bool {
        matches!(self, LoggerError::Config(_))
    }
}
