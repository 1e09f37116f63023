//! Transport trait: the abstraction over the HTTP backend.
//!
//! A Transport delivers one generate payload and hands back whatever the
//! server answered, without judging it. Classification happens in
//! [`crate::outcome`], so the session can be tested with scripted transports.

use std::time::Duration;

use async_trait::async_trait;

use crate::encoder::GeneratePayload;
use crate::error::{Error, TransportError};

/// Path of the generate endpoint on the backend.
pub const GENERATE_PATH: &str = "/api/generate";

/// Explicit connection settings, built once at process entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Ignore any proxy settings from the environment.
    pub bypass_proxy: bool,
}

impl TransportConfig {
    /// Base URL, e.g. `http://127.0.0.1:11434`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 11434,
            connect_timeout: Duration::from_secs(300),
            read_timeout: Duration::from_secs(300),
            bypass_proxy: true,
        }
    }
}

/// A response that arrived, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The core Transport trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// A human-readable name for this transport (e.g., "ollama").
    fn name(&self) -> &str;

    /// POST the payload to [`GENERATE_PATH`]. `Err` means no response was
    /// obtained at all; any status code is returned as `Ok`.
    async fn generate(&self, payload: &GeneratePayload) -> Result<RawResponse, TransportError>;

    /// List models installed on the backend.
    async fn list_models(&self) -> Result<Vec<String>, Error> {
        Ok(Vec::new())
    }

    /// Health check: can we reach the backend?
    async fn health_check(&self) -> Result<bool, Error> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_local_ollama() {
        let config = TransportConfig::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:11434");
        assert_eq!(config.connect_timeout, Duration::from_secs(300));
        assert_eq!(config.read_timeout, Duration::from_secs(300));
        assert!(config.bypass_proxy);
    }
}
