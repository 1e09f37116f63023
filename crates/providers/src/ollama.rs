//! Ollama transport: `POST /api/generate` over reqwest.
//!
//! The transport only delivers requests and reports what came back.
//! Failures to get any response at all are mapped to a
//! [`TransportErrorKind`] so the session can tell the user why.

use async_trait::async_trait;
use localchat_core::error::{DecodeError, Error, TransportError, TransportErrorKind};
use localchat_core::transport::{GENERATE_PATH, RawResponse, Transport, TransportConfig};
use localchat_core::GeneratePayload;
use serde::Deserialize;
use std::error::Error as _;
use std::io::ErrorKind;
use tracing::{debug, trace};

/// A transport for an Ollama-compatible backend.
pub struct OllamaTransport {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl OllamaTransport {
    /// Build the HTTP client from explicit settings. When `bypass_proxy` is
    /// set, proxy environment variables are ignored.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout);

        if config.bypass_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|e| Error::Config {
            message: format!("Failed to create HTTP client: {e}"),
        })?;

        Ok(Self {
            name: "ollama".into(),
            base_url: config.base_url(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Response of `GET /api/tags`.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

#[async_trait]
impl Transport for OllamaTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, payload: &GeneratePayload) -> Result<RawResponse, TransportError> {
        let url = format!("{}{GENERATE_PATH}", self.base_url);
        debug!(url = %url, model = %payload.model, "POST generate");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(to_transport_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(to_transport_error)?;
        trace!(status, bytes = body.len(), "Generate response received");

        Ok(RawResponse { status, body })
    }

    async fn list_models(&self) -> Result<Vec<String>, Error> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(to_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(to_transport_error)?;
        let tags: TagsResponse = serde_json::from_str(&body).map_err(DecodeError::from)?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn health_check(&self) -> Result<bool, Error> {
        let url = format!("{}/api/version", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(to_transport_error)?;

        Ok(response.status().is_success())
    }
}

fn to_transport_error(err: reqwest::Error) -> TransportError {
    let kind = classify_reqwest_error(&err);
    TransportError::new(kind, error_chain(&err))
}

/// Map a reqwest failure to the reason shown to the user.
fn classify_reqwest_error(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_redirect() {
        return TransportErrorKind::ExceedRedirectCount;
    }

    if let Some(kind) = io_error_kind(err) {
        if let Some(mapped) = classify_io_kind(kind, err.is_connect()) {
            return mapped;
        }
    }

    if err.is_connect() {
        TransportErrorKind::Connection
    } else if err.is_timeout() || err.is_body() || err.is_decode() {
        TransportErrorKind::Read
    } else if err.is_request() {
        TransportErrorKind::Write
    } else {
        TransportErrorKind::Unknown
    }
}

fn classify_io_kind(kind: ErrorKind, during_connect: bool) -> Option<TransportErrorKind> {
    match kind {
        ErrorKind::AddrNotAvailable | ErrorKind::AddrInUse => {
            Some(TransportErrorKind::BindIpAddress)
        }
        ErrorKind::ConnectionRefused => Some(TransportErrorKind::Connection),
        ErrorKind::BrokenPipe | ErrorKind::WriteZero => Some(TransportErrorKind::Write),
        ErrorKind::Interrupted => Some(TransportErrorKind::Canceled),
        ErrorKind::TimedOut if during_connect => Some(TransportErrorKind::Connection),
        ErrorKind::TimedOut => Some(TransportErrorKind::Read),
        _ => None,
    }
}

/// The innermost I/O error kind in the source chain, if any.
fn io_error_kind(err: &reqwest::Error) -> Option<ErrorKind> {
    let mut source = err.source();
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            return Some(io.kind());
        }
        source = inner.source();
    }
    None
}

/// `outer: inner: innermost`, for logs.
fn error_chain(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn constructor_uses_config_address() {
        let config = TransportConfig {
            host: "localhost".into(),
            port: 8080,
            ..TransportConfig::default()
        };
        let transport = OllamaTransport::new(&config).unwrap();
        assert_eq!(transport.name(), "ollama");
        assert_eq!(transport.base_url(), "http://localhost:8080");
    }

    #[test]
    fn builds_with_proxy_enabled() {
        let config = TransportConfig {
            bypass_proxy: false,
            connect_timeout: Duration::from_secs(1),
            ..TransportConfig::default()
        };
        assert!(OllamaTransport::new(&config).is_ok());
    }

    #[test]
    fn io_kinds_map_to_reasons() {
        assert_eq!(
            classify_io_kind(ErrorKind::ConnectionRefused, true),
            Some(TransportErrorKind::Connection)
        );
        assert_eq!(
            classify_io_kind(ErrorKind::AddrNotAvailable, true),
            Some(TransportErrorKind::BindIpAddress)
        );
        assert_eq!(
            classify_io_kind(ErrorKind::BrokenPipe, false),
            Some(TransportErrorKind::Write)
        );
        assert_eq!(
            classify_io_kind(ErrorKind::Interrupted, false),
            Some(TransportErrorKind::Canceled)
        );
        assert_eq!(
            classify_io_kind(ErrorKind::TimedOut, true),
            Some(TransportErrorKind::Connection)
        );
        assert_eq!(
            classify_io_kind(ErrorKind::TimedOut, false),
            Some(TransportErrorKind::Read)
        );
        assert_eq!(classify_io_kind(ErrorKind::Other, false), None);
    }

    #[test]
    fn tags_response_parsing() {
        let body = r#"{"models":[{"name":"qwen2.5-coder:7b","size":4683087332},{"name":"llama3:8b"}]}"#;
        let tags: TagsResponse = serde_json::from_str(body).unwrap();
        let names: Vec<_> = tags.models.into_iter().map(|m| m.name).collect();
        assert_eq!(names, ["qwen2.5-coder:7b", "llama3:8b"]);
    }

    #[test]
    fn empty_tags_response() {
        let tags: TagsResponse = serde_json::from_str("{}").unwrap();
        assert!(tags.models.is_empty());
    }
}
