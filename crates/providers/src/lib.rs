//! HTTP transports for localchat.
//!
//! All transports implement the `localchat_core::Transport` trait.

pub mod ollama;

pub use ollama::OllamaTransport;
