//! Chat session: one request/classify/mutate unit per call.
//!
//! The session owns the context buffer and the transcript sink. The buffer
//! only changes when an exchange ends in [`ExchangeOutcome::Success`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::context::ContextBuffer;
use crate::encoder::encode;
use crate::outcome::{ExchangeOutcome, classify};
use crate::transcript::TranscriptSink;
use crate::transport::Transport;

/// A single conversation with the backend.
pub struct ChatSession<L = Box<dyn TranscriptSink>> {
    model: String,
    context: ContextBuffer,
    transport: Arc<dyn Transport>,
    transcript: L,
}

impl<L: TranscriptSink> ChatSession<L> {
    /// Create a session with an empty transcript bounded to `max_context` bytes.
    pub fn new(
        model: impl Into<String>,
        max_context: usize,
        transport: Arc<dyn Transport>,
        transcript: L,
    ) -> Self {
        Self {
            model: model.into(),
            context: ContextBuffer::new(max_context),
            transport,
            transcript,
        }
    }

    /// Send `user_text` and return the reply, or a diagnostic string
    /// prefixed with `[Error]` / `[Fatal Error]`.
    pub async fn chat(&mut self, user_text: &str) -> String {
        self.exchange(user_text).await.into_message()
    }

    /// Like [`chat`](Self::chat) but returns the tagged outcome.
    pub async fn exchange(&mut self, user_text: &str) -> ExchangeOutcome {
        if let Err(e) = self.transcript.user_turn(user_text) {
            warn!(error = %e, "Failed to write user turn to transcript");
        }

        let payload = encode(&self.model, &self.context, user_text);
        debug!(
            transport = %self.transport.name(),
            model = %self.model,
            prompt_bytes = payload.prompt.len(),
            "Sending generate request"
        );

        let outcome = classify(self.transport.generate(&payload).await);

        if let ExchangeOutcome::Success(reply) = &outcome {
            if let Err(e) = self.transcript.reply(reply) {
                warn!(error = %e, "Failed to write reply to transcript");
            }
            if let Err(e) = self.transcript.flush() {
                warn!(error = %e, "Failed to flush transcript");
            }
            self.context.append(user_text, reply);
            self.context.enforce_limit();
            debug!(context_bytes = self.context.len(), "Exchange succeeded");
        }

        outcome
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn context(&self) -> &ContextBuffer {
        &self.context
    }

    pub fn transcript(&self) -> &L {
        &self.transcript
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }
}
