//! Pending message structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};

/// A fully rendered message waiting to be delivered.
///
/// Created by the logger for every accepted log call and moved, never shared:
/// from the calling thread into the delivery queue, then into the worker,
/// which drops it once the delivery attempt is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage {
    pub level: LogLevel,
    pub text: String,
    pub created_at: DateTime<Local>,
}

impl PendingMessage {
    pub fn new(level: LogLevel, text: String, created_at: DateTime<Local>) -> Self {
        Self {
            level,
            text,
            created_at,
        }
    }

    /// Whether delivering this message ends the process
    pub fn is_fatal(&self) -> bool {
        self.level == LogLevel::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_fatal_is_fatal() {
        let now = Local::now();
        for level in LogLevel::ALL {
            let message = PendingMessage::new(level, "text".to_string(), now);
            assert_eq!(message.is_fatal(), level == LogLevel::Fatal);
        }
    }
}
