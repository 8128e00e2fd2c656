//! Logger configuration
//!
//! [`LoggerConfig`] is assembled once, validated by
//! [`Logger::new`](crate::Logger::new) and never changes afterwards.
//! Configuration can also be resolved from environment variables through an
//! [`EnvProvider`], which keeps the core independent of the process
//! environment.

use super::diagnostics::{DiagnosticSink, StderrSink};
use super::error::{ConfigError, LoggerError, Result};
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use crate::transport::{HttpTransport, TlsPolicy, DEFAULT_API_BASE};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_CHAT_ID: &str = "TELEGRAM_CHAT_ID";
pub const ENV_LOG_LEVEL: &str = "TELEGRAM_LOG_LEVEL";
pub const ENV_APP_NAME: &str = "TELEGRAM_APP_NAME";
pub const ENV_ASYNC: &str = "TELEGRAM_ASYNC";
pub const ENV_DISABLE_COLORS: &str = "TELEGRAM_DISABLE_COLORS";
pub const ENV_TIME_FORMAT: &str = "TELEGRAM_TIME_FORMAT";

/// Default number of messages buffered by an async logger
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Action run after a Fatal message has been attempted
pub type FatalHandler = Arc<dyn Fn() + Send + Sync>;

/// Fatal handler that terminates the process with exit status 1
pub fn exit_process() -> FatalHandler {
    Arc::new(|| std::process::exit(1))
}

/// Source of configuration values
pub trait EnvProvider {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvProvider for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvProvider for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvProvider for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.to_string())
    }
}

/// Complete logger configuration
#[derive(Clone)]
pub struct LoggerConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub min_level: LogLevel,
    pub app_name: String,
    /// Deliver from a background worker instead of the calling thread
    pub async_delivery: bool,
    /// Use HTML emphasis markup for the badges
    pub colors: bool,
    pub timestamp_format: TimestampFormat,
    pub queue_capacity: usize,
    pub api_base_url: String,
    /// Ignored when `transport` is set
    pub tls: TlsPolicy,
    pub transport: Option<Arc<dyn HttpTransport>>,
    pub diagnostics: Arc<dyn DiagnosticSink>,
    pub fatal_handler: FatalHandler,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            min_level: LogLevel::Info,
            app_name: String::new(),
            async_delivery: true,
            colors: true,
            timestamp_format: TimestampFormat::Default,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            api_base_url: DEFAULT_API_BASE.to_string(),
            tls: TlsPolicy::default(),
            transport: None,
            diagnostics: Arc::new(StderrSink),
            fatal_handler: exit_process(),
        }
    }
}

impl LoggerConfig {
    /// Default configuration for one bot and chat
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            ..Self::default()
        }
    }

    /// Resolve a configuration from `TELEGRAM_*` variables
    ///
    /// Token and chat ID are required. Optional variables override the
    /// defaults only when set to a non-empty value. `TELEGRAM_ASYNC=false`
    /// selects synchronous delivery and `TELEGRAM_DISABLE_COLORS=true` turns
    /// badge markup off; any other value keeps the default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingEnv`] naming the first required variable that is
    /// unset or empty.
    pub fn from_env(env: &dyn EnvProvider) -> Result<Self> {
        let bot_token = required(env, ENV_BOT_TOKEN)?;
        let chat_id = required(env, ENV_CHAT_ID)?;
        let mut config = Self::new(bot_token, chat_id);

        if let Some(level) = optional(env, ENV_LOG_LEVEL) {
            config.min_level = LogLevel::from_str_lenient(&level);
        }
        if let Some(app_name) = optional(env, ENV_APP_NAME) {
            config.app_name = app_name;
        }
        if optional(env, ENV_ASYNC).as_deref() == Some("false") {
            config.async_delivery = false;
        }
        if optional(env, ENV_DISABLE_COLORS).as_deref() == Some("true") {
            config.colors = false;
        }
        if let Some(format) = optional(env, ENV_TIME_FORMAT) {
            config.timestamp_format = match format.parse::<TimestampFormat>() {
                Ok(format) => format,
                Err(never) => match never {},
            };
        }

        Ok(config)
    }

    /// Check the invariants a logger relies on
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.bot_token.is_empty() {
            return Err(ConfigError::MissingBotToken);
        }
        if self.chat_id.is_empty() {
            return Err(ConfigError::MissingChatId);
        }
        if self.async_delivery && self.queue_capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        Ok(())
    }
}

fn optional(env: &dyn EnvProvider, key: &str) -> Option<String> {
    env.var(key).filter(|value| !value.is_empty())
}

fn required(env: &dyn EnvProvider, key: &str) -> Result<String> {
    optional(env, key).ok_or_else(|| LoggerError::missing_env(key))
}

impl fmt::Debug for LoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.bot_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("LoggerConfig")
            .field("bot_token", &token)
            .field("chat_id", &self.chat_id)
            .field("min_level", &self.min_level)
            .field("app_name", &self.app_name)
            .field("async_delivery", &self.async_delivery)
            .field("colors", &self.colors)
            .field("timestamp_format", &self.timestamp_format)
            .field("queue_capacity", &self.queue_capacity)
            .field("api_base_url", &self.api_base_url)
            .field("tls", &self.tls)
            .field(
                "transport",
                &self.transport.as_ref().map(|transport| transport.name()),
            )
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::new("token", "chat");
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.app_name.is_empty());
        assert!(config.async_delivery);
        assert!(config.colors);
        assert_eq!(config.timestamp_format, TimestampFormat::Default);
        assert_eq!(config.queue_capacity, 100);
        assert_eq!(config.api_base_url, "https://api.telegram.org");
        assert!(config.transport.is_none());
    }

    #[test]
    fn test_validate() {
        assert_eq!(LoggerConfig::new("t", "c").validate(), Ok(()));
        assert_eq!(
            LoggerConfig::new("", "c").validate(),
            Err(ConfigError::MissingBotToken)
        );
        assert_eq!(
            LoggerConfig::new("t", "").validate(),
            Err(ConfigError::MissingChatId)
        );

        let mut config = LoggerConfig::new("t", "c");
        config.queue_capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidCapacity));

        config.async_delivery = false;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_from_env_requires_token_and_chat() {
        let err = LoggerConfig::from_env(&env(&[(ENV_CHAT_ID, "1")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid configuration: TELEGRAM_BOT_TOKEN environment variable not set");

        let err = LoggerConfig::from_env(&env(&[(ENV_BOT_TOKEN, "t"), (ENV_CHAT_ID, "")]))
            .unwrap_err();
        assert!(matches!(
            err,
            LoggerError::Config(ConfigError::MissingEnv(ref key)) if key == ENV_CHAT_ID
        ));
    }

    #[test]
    fn test_from_env_full() {
        let config = LoggerConfig::from_env(&env(&[
            (ENV_BOT_TOKEN, "t"),
            (ENV_CHAT_ID, "-100"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_APP_NAME, "billing"),
            (ENV_ASYNC, "false"),
            (ENV_DISABLE_COLORS, "true"),
            (ENV_TIME_FORMAT, "HH:mm"),
        ]))
        .expect("valid env");

        assert_eq!(config.bot_token, "t");
        assert_eq!(config.chat_id, "-100");
        assert_eq!(config.min_level, LogLevel::Warning);
        assert_eq!(config.app_name, "billing");
        assert!(!config.async_delivery);
        assert!(!config.colors);
        assert_eq!(config.timestamp_format, TimestampFormat::pattern("HH:mm"));
    }

    #[test]
    fn test_from_env_named_time_format() {
        let config = LoggerConfig::from_env(&env(&[
            (ENV_BOT_TOKEN, "t"),
            (ENV_CHAT_ID, "c"),
            (ENV_TIME_FORMAT, "RFC3339"),
        ]))
        .expect("valid env");

        assert_eq!(config.timestamp_format, TimestampFormat::Rfc3339);
    }

    #[test]
    fn test_from_env_only_exact_switch_values() {
        let config = LoggerConfig::from_env(&env(&[
            (ENV_BOT_TOKEN, "t"),
            (ENV_CHAT_ID, "c"),
            (ENV_LOG_LEVEL, "verbose"),
            (ENV_ASYNC, "no"),
            (ENV_DISABLE_COLORS, "yes"),
        ]))
        .expect("valid env");

        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.async_delivery);
        assert!(config.colors);
    }

    #[test]
    fn test_owned_map_provider() {
        let mut vars = HashMap::new();
        vars.insert(ENV_BOT_TOKEN.to_string(), "t".to_string());
        vars.insert(ENV_CHAT_ID.to_string(), "c".to_string());
        assert!(LoggerConfig::from_env(&vars).is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = LoggerConfig::new("123456:SECRET", "chat");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("SECRET"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("chat"));
    }
}
