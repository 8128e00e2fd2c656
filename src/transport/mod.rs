//! Outbound delivery to the Telegram Bot API
//!
//! [`TelegramSender`] builds the `sendMessage` request and classifies the
//! outcome. The actual HTTPS exchange goes through the [`HttpTransport`]
//! capability so the TLS policy, or the whole client, can be swapped.

pub mod http;
pub mod telegram;

pub use http::{TlsPolicy, TlsVersion, UreqTransport, DEFAULT_REQUEST_TIMEOUT};
pub use telegram::{SendMessage, TelegramSender, DEFAULT_API_BASE, PARSE_MODE};

/// Outcome of a failed delivery
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection, DNS, TLS or timeout failure
    #[error("endpoint unreachable: {reason}")]
    Unreachable { reason: String },

    /// The endpoint answered with a non-2xx status
    #[error("remote rejected message with HTTP status {status}")]
    RemoteRejected { status: u16 },

    /// The request body could not be serialized
    #[error("failed to encode message: {0}")]
    EncodingFailed(String),
}

impl TransportError {
    pub fn unreachable(reason: impl Into<String>) -> Self {
        TransportError::Unreachable {
            reason: reason.into(),
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Unreachable { .. })
    }
}

/// Capability to perform one HTTPS POST with a JSON body.
///
/// Implementations return the response status for any HTTP answer (2xx or
/// not) and [`TransportError::Unreachable`] when no answer was received.
/// They must not retry.
///
/// # Example
///
/// ```
/// use rust_telegram_logger::transport::{HttpTransport, TransportError};
///
/// struct AlwaysOk;
///
/// impl HttpTransport for AlwaysOk {
///     fn post_json(&self, _url: &str, _body: &str) -> Result<u16, TransportError> {
///         Ok(200)
///     }
/// }
/// ```
pub trait HttpTransport: Send + Sync {
    fn post_json(&self, url: &str, body: &str) -> Result<u16, TransportError>;

    fn name(&self) -> &str {
        "custom"
    }
}
