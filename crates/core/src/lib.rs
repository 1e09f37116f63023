//! # localchat core
//!
//! The conversational state and request pipeline of localchat:
//!
//! - [`context`]: the bounded transcript buffer
//! - [`encoder`]: builds the `/api/generate` payload and decodes replies
//! - [`outcome`]: classifies what came back
//! - [`session`]: ties them together behind `chat()`
//!
//! The HTTP transport and the transcript log are traits here; concrete
//! implementations live in `localchat-providers` and `localchat-history`.

pub mod context;
pub mod encoder;
pub mod error;
pub mod outcome;
pub mod session;
pub mod transcript;
pub mod transport;

// Re-export key types at crate root for ergonomics
pub use context::{ContextBuffer, DEFAULT_MAX_CONTEXT_CHARS};
pub use encoder::GeneratePayload;
pub use error::{DecodeError, Error, Result, TransportError, TransportErrorKind};
pub use outcome::{ExchangeOutcome, FATAL_MARKER};
pub use session::ChatSession;
pub use transcript::{MemoryTranscript, NoopTranscript, TranscriptSink};
pub use transport::{RawResponse, Transport, TransportConfig};
