//! Message formatting
//!
//! Renders a log call into the text sent to the chat:
//!
//! ```text
//! [app] [icon LEVEL] <timestamp> - <body>
//! ```
//!
//! The app badge disappears when no app name is configured. With colors
//! enabled the badges use Telegram HTML markup instead of plain brackets.
//! Caller-supplied text is HTML-escaped since messages are sent with
//! `parse_mode=HTML`.

use super::log_level::LogLevel;
use super::template::{self, Arg};
use super::timestamp::TimestampFormat;
use chrono::{DateTime, TimeZone};
use std::borrow::Cow;
use std::fmt;

/// Pure formatter built from the logger configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFormatter {
    app_name: String,
    colors: bool,
    timestamp_format: TimestampFormat,
}

impl MessageFormatter {
    pub fn new(app_name: impl Into<String>, colors: bool, timestamp_format: TimestampFormat) -> Self {
        Self {
            app_name: app_name.into(),
            colors,
            timestamp_format,
        }
    }

    /// Render a printf-style template and compose the final message
    ///
    /// # Example
    ///
    /// ```
    /// use rust_telegram_logger::core::{Arg, LogLevel, MessageFormatter, TimestampFormat};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let formatter = MessageFormatter::new("api", false, TimestampFormat::pattern("HH:mm"));
    /// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
    ///
    /// let text = formatter.format(LogLevel::Error, "status %d", &[Arg::from(503)], &at);
    /// assert_eq!(text, "[api] [❌ ERROR] 10:30 - status 503");
    /// ```
    pub fn format<Tz>(
        &self,
        level: LogLevel,
        template: &str,
        args: &[Arg<'_>],
        at: &DateTime<Tz>,
    ) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let body = template::render(template, args);
        self.format_message(level, &body, at)
    }

    /// Compose the final message from an already rendered body
    pub fn format_message<Tz>(&self, level: LogLevel, body: &str, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let timestamp = self.timestamp_format.format(at);
        let level_badge = level_badge(level, self.colors);
        let body = escape_html(body);

        if self.app_name.is_empty() {
            format!("{} {} - {}", level_badge, timestamp, body)
        } else {
            format!(
                "{} {} {} - {}",
                self.app_badge(),
                level_badge,
                timestamp,
                body
            )
        }
    }

    fn app_badge(&self) -> String {
        let name = escape_html(&self.app_name);
        if self.colors {
            format!("<b>[{}]</b>", name)
        } else {
            format!("[{}]", name)
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    pub fn timestamp_format(&self) -> &TimestampFormat {
        &self.timestamp_format
    }
}

/// Icon plus level label, bracketed or wrapped in emphasis markup
pub fn level_badge(level: LogLevel, colors: bool) -> String {
    match (colors, level.is_emphasized()) {
        (false, _) => format!("[{} {}]", level.icon(), level.label()),
        (true, false) => format!("{} <code>{}</code>", level.icon(), level.label()),
        (true, true) => format!("{} <b><code>{}</code></b>", level.icon(), level.label()),
    }
}

/// Escape the characters Telegram's HTML parse mode treats as markup
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
