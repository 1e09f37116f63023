//! File-based transcript: append-only plain text.
//!
//! The file is opened once in append mode and kept open for the lifetime of
//! the session. User turns are flushed as soon as they are written, so the
//! line survives a request that never returns. Replies are flushed by the
//! session after every successful exchange.

use localchat_core::TranscriptSink;
use localchat_core::transcript::{REPLY_LOG_PREFIX, USER_LOG_PREFIX};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An append-only transcript file.
pub struct FileTranscript {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileTranscript {
    /// Open (or create) the transcript at `path` in append mode.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        debug!(path = %path.display(), "Transcript log opened");

        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&mut self, prefix: &str, text: &str) -> io::Result<()> {
        self.writer.write_all(prefix.as_bytes())?;
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"\n")
    }
}

impl TranscriptSink for FileTranscript {
    fn user_turn(&mut self, text: &str) -> io::Result<()> {
        self.write_line(USER_LOG_PREFIX, text)?;
        self.writer.flush()
    }

    fn reply(&mut self, text: &str) -> io::Result<()> {
        self.write_line(REPLY_LOG_PREFIX, text)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
