//! `localchat chat`: greeting exchange, then interactive chat.

use std::sync::Arc;

use localchat_config::AppConfig;
use localchat_core::{ChatSession, NoopTranscript, TranscriptSink};
use localchat_history::FileTranscript;
use localchat_providers::OllamaTransport;

use super::Overrides;
use crate::repl;

pub async fn run(
    overrides: &Overrides,
    message: Option<String>,
    no_greeting: bool,
    max_context: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(overrides)?;
    if let Some(max) = max_context {
        config.context.max_chars = max;
        config.validate()?;
    }

    let transport = Arc::new(OllamaTransport::new(&config.transport_config())?);
    let transcript = open_transcript(&config);
    let mut session: ChatSession = ChatSession::new(
        config.model.clone(),
        config.context.max_chars,
        transport,
        transcript,
    );

    if let Some(msg) = message {
        // Single message mode
        println!("{}", session.chat(&msg).await);
        return Ok(());
    }

    println!("=== localchat ===");
    println!("Connecting to {}:{} ...", config.backend.host, config.backend.port);
    println!("Model: {}", config.model);
    println!("Type 'exit' to quit.");
    println!(">>> Client ready. Sending the first message...");

    let greeting = (!no_greeting).then_some(config.greeting.as_str());
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    repl::run(&mut session, greeting, input, &mut stdout).await?;

    println!();
    Ok(())
}

/// Open the transcript log, or fall back to no logging if disabled or the
/// file cannot be opened.
fn open_transcript(config: &AppConfig) -> Box<dyn TranscriptSink> {
    if !config.history.enabled {
        return Box::new(NoopTranscript);
    }

    match FileTranscript::open(&config.history.path) {
        Ok(log) => Box::new(log),
        Err(e) => {
            tracing::warn!(
                path = %config.history.path.display(),
                error = %e,
                "Cannot open transcript log, continuing without it"
            );
            Box::new(NoopTranscript)
        }
    }
}
