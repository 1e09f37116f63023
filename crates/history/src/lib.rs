//! Transcript log backends for localchat.
//!
//! All backends implement `localchat_core::TranscriptSink`.

pub mod file_backend;

pub use file_backend::FileTranscript;
