//! Main logger implementation

use super::{
    config::{EnvProvider, FatalHandler, LoggerConfig, ProcessEnv},
    delivery::{DeliveryQueue, Dispatcher, QueueState},
    diagnostics::DiagnosticSink,
    error::{LoggerError, Result},
    formatter::MessageFormatter,
    log_entry::PendingMessage,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    template::Arg,
    timestamp::TimestampFormat,
};
use crate::transport::{HttpTransport, TelegramSender, TlsPolicy, UreqTransport};
use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Forwards log messages to a Telegram chat
///
/// In async mode (the default) `log()` only enqueues; delivery happens on a
/// background worker and [`close`](Self::close) is the point at which every
/// accepted message has been attempted. In sync mode `log()` delivers on the
/// calling thread before returning.
///
/// Dropping the logger closes it.
///
/// # Example
///
/// ```no_run
/// use rust_telegram_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .bot_token("123456:ABC")
///     .chat_id("-1001234567890")
///     .app_name("billing")
///     .min_level(LogLevel::Warning)
///     .build()?;
///
/// logger.error("charge %s failed with status %d", &[Arg::from("ch_42"), Arg::from(402)]);
/// logger.close();
/// # Ok::<(), rust_telegram_logger::LoggerError>(())
/// ```
pub struct Logger {
    min_level: LogLevel,
    formatter: MessageFormatter,
    dispatcher: Arc<Dispatcher>,
    /// Present in async mode only
    queue: Option<DeliveryQueue>,
    closed: AtomicBool,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Build a logger from a complete configuration
    ///
    /// # Errors
    ///
    /// - [`LoggerError::Config`] if the bot token or chat ID is empty, or the
    ///   queue capacity is zero in async mode
    /// - [`LoggerError::TlsSetup`] if the default transport cannot be built
    /// - [`LoggerError::WorkerSpawn`] if the delivery thread cannot start
    pub fn new(config: LoggerConfig) -> Result<Self> {
        config.validate()?;

        let transport: Arc<dyn HttpTransport> = match config.transport {
            Some(transport) => transport,
            None => Arc::new(UreqTransport::new(config.tls)?),
        };
        let sender = TelegramSender::new(&config.bot_token, &config.api_base_url, transport);

        let metrics = Arc::new(LoggerMetrics::new());
        let dispatcher = Arc::new(Dispatcher::new(
            sender,
            config.chat_id,
            config.diagnostics,
            Arc::clone(&metrics),
            config.fatal_handler,
        ));

        let queue = if config.async_delivery {
            Some(DeliveryQueue::start(
                config.queue_capacity,
                Arc::clone(&dispatcher),
                Arc::clone(&metrics),
            )?)
        } else {
            None
        };

        Ok(Self {
            min_level: config.min_level,
            formatter: MessageFormatter::new(
                config.app_name,
                config.colors,
                config.timestamp_format,
            ),
            dispatcher,
            queue,
            closed: AtomicBool::new(false),
            metrics,
        })
    }

    /// Build a logger from the `TELEGRAM_*` process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(&ProcessEnv)
    }

    /// Build a logger from variables supplied by `env`
    pub fn from_env_with(env: &dyn EnvProvider) -> Result<Self> {
        Self::new(LoggerConfig::from_env(env)?)
    }

    /// Default logger for `app_name`, with token and chat ID from the
    /// environment
    pub fn simple(app_name: impl Into<String>) -> Result<Self> {
        Self::simple_with(app_name, &ProcessEnv)
    }

    /// Like [`simple`](Self::simple), reading from `env`
    pub fn simple_with(app_name: impl Into<String>, env: &dyn EnvProvider) -> Result<Self> {
        let token = env
            .var(super::config::ENV_BOT_TOKEN)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| LoggerError::missing_env(super::config::ENV_BOT_TOKEN))?;
        let chat_id = env
            .var(super::config::ENV_CHAT_ID)
            .filter(|chat_id| !chat_id.is_empty())
            .ok_or_else(|| LoggerError::missing_env(super::config::ENV_CHAT_ID))?;

        let mut config = LoggerConfig::new(token, chat_id);
        config.app_name = app_name.into();
        Self::new(config)
    }

    /// Log a printf-style template with positional arguments
    ///
    /// Never fails: messages below the minimum level or logged after close
    /// are dropped, and delivery failures go to the diagnostic sink.
    pub fn log(&self, level: LogLevel, template: &str, args: &[Arg<'_>]) {
        if !self.accepts(level) {
            return;
        }

        let now = Local::now();
        let text = self.formatter.format(level, template, args, &now);
        self.submit(PendingMessage::new(level, text, now));
    }

    /// Log an already rendered message body
    pub fn log_message(&self, level: LogLevel, message: &str) {
        if !self.accepts(level) {
            return;
        }

        let now = Local::now();
        let text = self.formatter.format_message(level, message, &now);
        self.submit(PendingMessage::new(level, text, now));
    }

    fn accepts(&self, level: LogLevel) -> bool {
        if level < self.min_level {
            self.metrics.record_filtered();
            return false;
        }
        if self.closed.load(Ordering::Acquire) {
            self.metrics.record_dropped_after_close();
            return false;
        }
        true
    }

    fn submit(&self, message: PendingMessage) {
        match &self.queue {
            Some(queue) => {
                queue.enqueue(message);
            }
            None => self.dispatcher.dispatch(&message),
        }
    }

    #[inline]
    pub fn debug(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Debug, template, args);
    }

    #[inline]
    pub fn info(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Info, template, args);
    }

    #[inline]
    pub fn warning(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Warning, template, args);
    }

    /// Alias for [`warning`](Self::warning)
    #[inline]
    pub fn warn(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Warning, template, args);
    }

    #[inline]
    pub fn error(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Error, template, args);
    }

    /// Log at Fatal, then run the fatal handler once the message has been
    /// attempted. The default handler exits the process with status 1.
    #[inline]
    pub fn fatal(&self, template: &str, args: &[Arg<'_>]) {
        self.log(LogLevel::Fatal, template, args);
    }

    /// Stop accepting messages and wait until every accepted one has been
    /// attempted
    ///
    /// Safe to call more than once and from several threads; only the first
    /// call drains, later calls return once that drain is over.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        if let Some(queue) = &self.queue {
            queue.close();
        }
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn is_async(&self) -> bool {
        self.queue.is_some()
    }

    /// Lifecycle of the delivery queue, `None` in sync mode
    pub fn queue_state(&self) -> Option<QueueState> {
        self.queue.as_ref().map(DeliveryQueue::state)
    }

    /// Messages accepted but not yet attempted (always 0 in sync mode)
    pub fn pending(&self) -> usize {
        self.queue.as_ref().map_or(0, DeliveryQueue::pending)
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    pub fn formatter(&self) -> &MessageFormatter {
        &self.formatter
    }

    /// Delivery counters
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_telegram_logger::Logger;
    ///
    /// let logger = Logger::simple("api")?;
    /// logger.info("started", &[]);
    /// logger.close();
    ///
    /// let metrics = logger.metrics();
    /// println!("delivered: {}", metrics.delivered_count());
    /// println!("failure rate: {:.2}%", metrics.failure_rate());
    /// # Ok::<(), rust_telegram_logger::LoggerError>(())
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("formatter", &self.formatter)
            .field("async", &self.is_async())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// Starts from [`LoggerConfig::default`]; token and chat ID must be set
/// before [`build`](Self::build).
///
/// # Example
///
/// ```no_run
/// use rust_telegram_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .bot_token("123456:ABC")
///     .chat_id("42")
///     .async_delivery(false)
///     .colors(false)
///     .timestamp_format(TimestampFormat::pattern("HH:mm:ss"))
///     .tls_policy(TlsPolicy::default().with_timeout(Duration::from_secs(5)))
///     .build()?;
/// # Ok::<(), rust_telegram_logger::LoggerError>(())
/// ```
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    config: LoggerConfig,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: LoggerConfig) -> Self {
        Self { config }
    }

    #[must_use = "builder methods return a new value"]
    pub fn bot_token(mut self, token: impl Into<String>) -> Self {
        self.config.bot_token = token.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn chat_id(mut self, chat_id: impl Into<String>) -> Self {
        self.config.chat_id = chat_id.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.config.app_name = app_name.into();
        self
    }

    /// Deliver from a background worker (default) or on the calling thread
    #[must_use = "builder methods return a new value"]
    pub fn async_delivery(mut self, enabled: bool) -> Self {
        self.config.async_delivery = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.config.colors = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.config.timestamp_format = format;
        self
    }

    /// Number of messages buffered before producers block
    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Bot API base URL, e.g. a local Bot API server
    #[must_use = "builder methods return a new value"]
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn tls_policy(mut self, policy: TlsPolicy) -> Self {
        self.config.tls = policy;
        self
    }

    /// Replace the HTTPS client; the TLS policy is then ignored
    #[must_use = "builder methods return a new value"]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.config.diagnostics = sink;
        self
    }

    /// Action run after a Fatal message has been attempted
    #[must_use = "builder methods return a new value"]
    pub fn fatal_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let handler: FatalHandler = Arc::new(handler);
        self.config.fatal_handler = handler;
        self
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn build(self) -> Result<Logger> {
        Logger::new(self.config)
    }
}
