//! Transcript sinks: where the append-only chat log goes.
//!
//! Format: one `[用户]:{text}` line per user turn and one `[AI]:{text}` line
//! per successful reply.

use std::io;

/// Line prefix for user turns in the transcript log.
pub const USER_LOG_PREFIX: &str = "[用户]:";
/// Line prefix for replies in the transcript log.
pub const REPLY_LOG_PREFIX: &str = "[AI]:";

/// Trait for transcript sinks.
pub trait TranscriptSink: Send {
    /// Record the user's line. Called before the request is sent.
    fn user_turn(&mut self, text: &str) -> io::Result<()>;

    /// Record a successful reply.
    fn reply(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

impl<T: TranscriptSink + ?Sized> TranscriptSink for Box<T> {
    fn user_turn(&mut self, text: &str) -> io::Result<()> {
        (**self).user_turn(text)
    }

    fn reply(&mut self, text: &str) -> io::Result<()> {
        (**self).reply(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Keeps the formatted lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryTranscript {
    lines: Vec<String>,
    flushes: usize,
}

impl MemoryTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// How many times `flush` was called.
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl TranscriptSink for MemoryTranscript {
    fn user_turn(&mut self, text: &str) -> io::Result<()> {
        self.lines.push(format!("{USER_LOG_PREFIX}{text}"));
        Ok(())
    }

    fn reply(&mut self, text: &str) -> io::Result<()> {
        self.lines.push(format!("{REPLY_LOG_PREFIX}{text}"));
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Discards everything. Used when history logging is disabled.
pub struct NoopTranscript;

impl TranscriptSink for NoopTranscript {
    fn user_turn(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }

    fn reply(&mut self, _text: &str) -> io::Result<()> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
