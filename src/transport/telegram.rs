//! Telegram `sendMessage` request construction

use super::{HttpTransport, TransportError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Production Bot API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Parse mode attached to every message
pub const PARSE_MODE: &str = "HTML";

/// JSON body of a `sendMessage` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'a str,
}

impl<'a> SendMessage<'a> {
    pub fn new(chat_id: &'a str, text: &'a str) -> Self {
        Self {
            chat_id,
            text,
            parse_mode: PARSE_MODE,
        }
    }
}

/// Sends formatted messages to one bot endpoint
///
/// Exactly one request is made per [`deliver`](Self::deliver) call; there is
/// no retry.
#[derive(Clone)]
pub struct TelegramSender {
    endpoint: String,
    transport: Arc<dyn HttpTransport>,
}

impl TelegramSender {
    pub fn new(bot_token: &str, api_base: &str, transport: Arc<dyn HttpTransport>) -> Self {
        let endpoint = format!(
            "{}/bot{}/sendMessage",
            api_base.trim_end_matches('/'),
            bot_token
        );
        Self {
            endpoint,
            transport,
        }
    }

    /// Deliver `text` to `chat_id`
    ///
    /// Any 2xx status is success. Other statuses become
    /// [`TransportError::RemoteRejected`].
    pub fn deliver(&self, chat_id: &str, text: &str) -> Result<(), TransportError> {
        let body = serde_json::to_string(&SendMessage::new(chat_id, text))
            .map_err(|e| TransportError::EncodingFailed(e.to_string()))?;

        let status = self.transport.post_json(&self.endpoint, &body)?;
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(TransportError::RemoteRejected { status })
        }
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }
}

impl fmt::Debug for TelegramSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The endpoint embeds the bot token
        f.debug_struct("TelegramSender")
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Recording {
        status: Result<u16, TransportError>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl Recording {
        fn answering(status: Result<u16, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                status,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    impl HttpTransport for Recording {
        fn post_json(&self, url: &str, body: &str) -> Result<u16, TransportError> {
            self.requests.lock().push((url.to_string(), body.to_string()));
            self.status.clone()
        }
    }

    #[test]
    fn test_request_shape() {
        let transport = Recording::answering(Ok(200));
        let sender = TelegramSender::new("123:abc", DEFAULT_API_BASE, transport.clone());

        sender.deliver("-100", "<b>hi</b> \"there\"").expect("delivered");

        let requests = transport.requests.lock();
        assert_eq!(requests.len(), 1);
        let (url, body) = &requests[0];
        assert_eq!(url, "https://api.telegram.org/bot123:abc/sendMessage");

        let json: serde_json::Value = serde_json::from_str(body).expect("valid json");
        assert_eq!(json["chat_id"], "-100");
        assert_eq!(json["text"], "<b>hi</b> \"there\"");
        assert_eq!(json["parse_mode"], "HTML");
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let transport = Recording::answering(Ok(200));
        let sender = TelegramSender::new("t", "http://127.0.0.1:9000/", transport.clone());
        sender.deliver("1", "x").expect("delivered");
        assert_eq!(
            transport.requests.lock()[0].0,
            "http://127.0.0.1:9000/bott/sendMessage"
        );
    }

    #[test]
    fn test_any_2xx_is_success() {
        for status in [200, 201, 204, 299] {
            let sender = TelegramSender::new("t", DEFAULT_API_BASE, Recording::answering(Ok(status)));
            assert_eq!(sender.deliver("1", "x"), Ok(()));
        }
    }

    #[test]
    fn test_non_2xx_is_rejected() {
        for status in [199, 301, 400, 403, 429, 500] {
            let sender = TelegramSender::new("t", DEFAULT_API_BASE, Recording::answering(Ok(status)));
            assert_eq!(
                sender.deliver("1", "x"),
                Err(TransportError::RemoteRejected { status })
            );
        }
    }

    #[test]
    fn test_unreachable_is_passed_through() {
        let sender = TelegramSender::new(
            "t",
            DEFAULT_API_BASE,
            Recording::answering(Err(TransportError::unreachable("dns"))),
        );
        let err = sender.deliver("1", "x").expect_err("unreachable");
        assert!(err.is_unreachable());
    }

    #[test]
    fn test_debug_hides_token() {
        let sender = TelegramSender::new("secret-token", DEFAULT_API_BASE, Recording::answering(Ok(200)));
        assert!(!format!("{:?}", sender).contains("secret-token"));
    }
}
