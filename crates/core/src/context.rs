//! Context buffer: the running transcript that gives the backend memory.
//!
//! Turns are flattened into one string with role markers:
//!
//! ```text
//! \n[User]:{user}\n[AI]:{reply}\n[User]:{user}\n[AI]:{reply}
//! ```
//!
//! The buffer is bounded in bytes. Trimming drops the oldest content, first
//! aligning the cut to a character boundary and then to the next newline.

/// Default maximum retained transcript length, in bytes.
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 2000;

const USER_MARKER: &str = "\n[User]:";
const AI_MARKER: &str = "\n[AI]:";

/// The bounded conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBuffer {
    text: String,
    max_len: usize,
}

impl ContextBuffer {
    /// Create an empty buffer retaining at most `max_len` bytes after trimming.
    pub fn new(max_len: usize) -> Self {
        Self {
            text: String::new(),
            max_len,
        }
    }

    /// Create a buffer seeded with an existing transcript. Not trimmed until
    /// the next [`enforce_limit`](Self::enforce_limit).
    pub fn with_transcript(max_len: usize, transcript: impl Into<String>) -> Self {
        Self {
            text: transcript.into(),
            max_len,
        }
    }

    /// Append one turn. Any text is accepted, including empty strings.
    pub fn append(&mut self, user_text: &str, reply_text: &str) {
        self.text.reserve(USER_MARKER.len() + AI_MARKER.len() + user_text.len() + reply_text.len());
        self.text.push_str(USER_MARKER);
        self.text.push_str(user_text);
        self.text.push_str(AI_MARKER);
        self.text.push_str(reply_text);
    }

    /// The exact prompt sent for the current turn. Does not mutate the buffer.
    pub fn render_prompt(&self, user_text: &str) -> String {
        format!("{}{USER_MARKER}{user_text}[AI]:", self.text)
    }

    /// Trim the oldest content until the buffer fits in `max_len` bytes.
    ///
    /// The cut point is moved forward to a character boundary, everything
    /// before it is dropped, and then everything through the first remaining
    /// newline. If no newline remains, the boundary-aligned tail is kept.
    pub fn enforce_limit(&mut self) {
        let len = self.text.len();
        if len <= self.max_len {
            return;
        }

        let mut cut = len - self.max_len;
        while !self.text.is_char_boundary(cut) {
            cut += 1;
        }
        self.text.drain(..cut);

        if let Some(newline) = self.text.find('\n') {
            self.text.drain(..=newline);
        }

        tracing::debug!(
            before = len,
            after = self.text.len(),
            max = self.max_len,
            "Trimmed context buffer"
        );
    }

    /// The current transcript.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Transcript length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for ContextBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTEXT_CHARS)
    }
}
