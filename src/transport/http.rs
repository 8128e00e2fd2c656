//! ureq-backed HTTPS transport
//!
//! Builds a `ureq::Agent` around a native-tls connector configured from a
//! [`TlsPolicy`].

use super::{HttpTransport, TransportError};
use crate::core::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use ureq::{Agent, AgentBuilder};

/// Default timeout for one delivery request (10 seconds)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum TLS protocol version accepted by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TlsVersion {
    Tls10,
    Tls11,
    #[default]
    Tls12,
}

impl TlsVersion {
    fn protocol(self) -> native_tls::Protocol {
        match self {
            TlsVersion::Tls10 => native_tls::Protocol::Tlsv10,
            TlsVersion::Tls11 => native_tls::Protocol::Tlsv11,
            TlsVersion::Tls12 => native_tls::Protocol::Tlsv12,
        }
    }
}

/// Connection policy applied to the HTTPS client
///
/// The policy only changes how connections are made; delivery control flow
/// is identical for every policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPolicy {
    pub min_tls_version: TlsVersion,
    /// Skip certificate and hostname verification. Never enable this outside
    /// of local testing.
    pub accept_invalid_certs: bool,
    pub timeout: Duration,
    /// Whether HTTP/2 may be negotiated. The ureq client speaks HTTP/1.1
    /// only, so this never turns HTTP/2 on.
    pub allow_http2: bool,
}

impl Default for TlsPolicy {
    fn default() -> Self {
        Self {
            min_tls_version: TlsVersion::Tls12,
            accept_invalid_certs: false,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            allow_http2: false,
        }
    }
}

impl TlsPolicy {
    #[must_use]
    pub fn with_min_tls_version(mut self, version: TlsVersion) -> Self {
        self.min_tls_version = version;
        self
    }

    #[must_use]
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_http2(mut self, allow: bool) -> Self {
        self.allow_http2 = allow;
        self
    }
}

/// Default [`HttpTransport`] implementation
pub struct UreqTransport {
    agent: Agent,
    policy: TlsPolicy,
}

impl UreqTransport {
    /// Build a transport honoring `policy`
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::TlsSetup`] if the TLS backend rejects the policy.
    pub fn new(policy: TlsPolicy) -> Result<Self> {
        let connector = native_tls::TlsConnector::builder()
            .min_protocol_version(Some(policy.min_tls_version.protocol()))
            .danger_accept_invalid_certs(policy.accept_invalid_certs)
            .danger_accept_invalid_hostnames(policy.accept_invalid_certs)
            .build()
            .map_err(|e| LoggerError::tls_setup(e.to_string()))?;

        let agent = AgentBuilder::new()
            .tls_connector(Arc::new(connector))
            .timeout(policy.timeout)
            .build();

        Ok(Self { agent, policy })
    }

    pub fn policy(&self) -> &TlsPolicy {
        &self.policy
    }
}

impl HttpTransport for UreqTransport {
    fn post_json(&self, url: &str, body: &str) -> std::result::Result<u16, TransportError> {
        let response = self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(body);

        match response {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(status, _)) => Ok(status),
            // The URL carries the bot token, so only the error kind is kept.
            Err(ureq::Error::Transport(transport)) => {
                Err(TransportError::unreachable(transport.kind().to_string()))
            }
        }
    }

    fn name(&self) -> &str {
        "ureq"
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;

    /// Serve one request on `listener`, answer with `status`, report the body
    fn spawn_one_shot_server(listener: TcpListener, status: u16) -> mpsc::Receiver<String> {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let body = read_request_body(&stream);
            let mut stream = stream;
            let response = format!(
                "HTTP/1.1 {} Status\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{{}}",
                status
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = tx.send(body);
        });
        rx
    }

    fn read_request_body(stream: &TcpStream) -> String {
        let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap_or(0) == 0 || line.trim().is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                if key.trim().eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
            }
        }
        let mut body = vec![0u8; content_length];
        let _ = reader.read_exact(&mut body);
        String::from_utf8_lossy(&body).to_string()
    }

    #[test]
    fn test_default_policy() {
        let policy = TlsPolicy::default();
        assert_eq!(policy.min_tls_version, TlsVersion::Tls12);
        assert!(!policy.accept_invalid_certs);
        assert_eq!(policy.timeout, Duration::from_secs(10));
        assert!(!policy.allow_http2);
    }

    #[test]
    fn test_policy_builder() {
        let policy = TlsPolicy::default()
            .with_min_tls_version(TlsVersion::Tls11)
            .with_accept_invalid_certs(true)
            .with_timeout(Duration::from_secs(3))
            .with_http2(true);

        assert_eq!(policy.min_tls_version, TlsVersion::Tls11);
        assert!(policy.accept_invalid_certs);
        assert_eq!(policy.timeout, Duration::from_secs(3));
        assert!(policy.allow_http2);
    }

    #[test]
    fn test_posts_json_and_returns_status() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let bodies = spawn_one_shot_server(listener, 200);

        let transport = UreqTransport::new(TlsPolicy::default()).expect("build transport");
        let status = transport
            .post_json(&format!("http://{}/botTOKEN/sendMessage", addr), r#"{"text":"hi"}"#)
            .expect("post succeeds");

        assert_eq!(status, 200);
        let body = bodies.recv_timeout(Duration::from_secs(5)).expect("captured body");
        assert_eq!(body, r#"{"text":"hi"}"#);
    }

    #[test]
    fn test_error_status_is_returned_not_raised() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let _bodies = spawn_one_shot_server(listener, 403);

        let transport = UreqTransport::new(TlsPolicy::default()).expect("build transport");
        let status = transport
            .post_json(&format!("http://{}/botTOKEN/sendMessage", addr), "{}")
            .expect("an HTTP answer is not a transport failure");

        assert_eq!(status, 403);
    }

    #[test]
    fn test_connection_refused_is_unreachable_without_url() {
        // Bind then drop to get a port nobody listens on
        let addr = TcpListener::bind(("127.0.0.1", 0))
            .and_then(|l| l.local_addr())
            .expect("reserve port");

        let transport = UreqTransport::new(TlsPolicy::default().with_timeout(Duration::from_secs(2)))
            .expect("build transport");
        let err = transport
            .post_json(&format!("http://{}/botSECRET/sendMessage", addr), "{}")
            .expect_err("nothing is listening");

        assert!(err.is_unreachable());
        assert!(!err.to_string().contains("SECRET"));
    }
}
