//! Error types for localchat.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Chat exchanges never propagate these: the session turns them into an
//! [`ExchangeOutcome`](crate::outcome::ExchangeOutcome). They surface as
//! `Err` only from auxiliary operations such as model listing.

use thiserror::Error;

/// The top-level error type for localchat operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Backend returned status {status_code}")]
    Status { status_code: u16 },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a request produced no HTTP response at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, or the port is blocked.
    Connection,
    /// The local address could not be bound.
    BindIpAddress,
    /// Reading the response failed or timed out.
    Read,
    /// Sending the request failed.
    Write,
    /// Too many redirects.
    ExceedRedirectCount,
    /// The request was canceled before completion.
    Canceled,
    /// Anything else. Often a proxy intercepting the connection.
    Unknown,
}

impl TransportErrorKind {
    /// Human-readable reason shown after `[Fatal Error]`.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Connection => "Connection (connection refused / port blocked)",
            Self::BindIpAddress => "BindIpAddress (failed to bind IP address)",
            Self::Read => "Read (read timed out)",
            Self::Write => "Write (failed to send request)",
            Self::ExceedRedirectCount => "ExceedRedirectCount",
            Self::Canceled => "Canceled",
            Self::Unknown => "Unknown Error (possibly intercepted by a proxy)",
        }
    }
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

/// No response was obtained from the backend.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {detail}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    /// Low-level detail from the HTTP client, for logs.
    pub detail: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// A 200 response whose body is not the expected shape.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DecodeError(pub String);

impl From<serde_json::Error> for DecodeError {
    fn from(e: serde_json::Error) -> Self {
        Self(e.to_string())
    }
}
