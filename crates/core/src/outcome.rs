//! Exchange outcomes and the classifier that produces them.

use crate::encoder::decode_reply;
use crate::error::{TransportError, TransportErrorKind};
use crate::transport::RawResponse;

/// Marker prefixed to outcomes where the request never got a response.
pub const FATAL_MARKER: &str = "[Fatal Error]";
/// Marker prefixed to outcomes where the backend answered unusably.
pub const ERROR_MARKER: &str = "[Error]";

/// The result of one chat exchange. Exactly one holds per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// 200 with a decodable reply.
    Success(String),
    /// The backend answered with a non-200 status.
    ServerRejected(u16),
    /// No response was obtained at all.
    TransportFailure(TransportErrorKind),
    /// 200, but the body could not be decoded.
    MalformedResponse(String),
}

impl ExchangeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::TransportFailure(_))
    }

    /// The string handed back to the caller: the raw reply on success,
    /// otherwise a diagnostic.
    pub fn into_message(self) -> String {
        match self {
            Self::Success(reply) => reply,
            other => other.to_string(),
        }
    }
}

impl std::fmt::Display for ExchangeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success(reply) => f.write_str(reply),
            Self::ServerRejected(status) => write!(
                f,
                "{ERROR_MARKER} server reachable but refused the request. Status code: {status}"
            ),
            Self::TransportFailure(kind) => write!(
                f,
                "{FATAL_MARKER} request was never delivered! Reason: {kind}"
            ),
            Self::MalformedResponse(detail) => {
                write!(f, "{ERROR_MARKER} failed to parse response JSON: {detail}")
            }
        }
    }
}

/// Turn a transport result into an outcome.
pub fn classify(result: Result<RawResponse, TransportError>) -> ExchangeOutcome {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(kind = ?e.kind, detail = %e.detail, "No response from backend");
            return ExchangeOutcome::TransportFailure(e.kind);
        }
    };

    if response.status != 200 {
        tracing::warn!(status = response.status, body = %response.body, "Backend rejected request");
        return ExchangeOutcome::ServerRejected(response.status);
    }

    match decode_reply(&response.body) {
        Ok(reply) => ExchangeOutcome::Success(reply),
        Err(e) => {
            tracing::warn!(error = %e, "Malformed response body");
            ExchangeOutcome::MalformedResponse(e.0)
        }
    }
}
