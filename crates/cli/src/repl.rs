//! The interactive loop: greeting, then read-chat-print until `exit` or EOF.

use std::borrow::Cow;
use std::io::{self, Write};

use localchat_core::{ChatSession, FATAL_MARKER, TranscriptSink};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::warn;

/// Printed when the greeting exchange could not reach the backend.
pub const DIAGNOSTIC_HINTS: &str = "\n=== Diagnostic hints ===\n\
1. Fully shut down any VPN / proxy / network accelerator software.\n\
2. Check whether a firewall is blocking this program or the backend port.\n";

const EXIT_COMMAND: &str = "exit";

/// Run the chat loop over `input`, writing everything to `out`.
///
/// Returns when the user types exactly `exit` or input ends.
pub async fn run<L, R, W>(
    session: &mut ChatSession<L>,
    greeting: Option<&str>,
    mut input: R,
    out: &mut W,
) -> io::Result<()>
where
    L: TranscriptSink,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if let Some(greeting) = greeting {
        let reply = session.chat(greeting).await;
        writeln!(out, "[AI reply]: {reply}")?;
        if reply.contains(FATAL_MARKER) {
            write!(out, "{DIAGNOSTIC_HINTS}")?;
        }
    }

    let mut buf = Vec::new();
    loop {
        write!(out, "\n[You]: ")?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        let line = decode_line(&buf);

        if line == EXIT_COMMAND {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let reply = session.chat(&line).await;
        writeln!(out, "[AI]: {reply}")?;
    }

    Ok(())
}

/// Strip the line ending. Invalid UTF-8 is replaced rather than rejected.
fn decode_line(raw: &[u8]) -> Cow<'_, str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = String::from_utf8_lossy(raw);
    if let Cow::Owned(_) = line {
        warn!("Input line is not valid UTF-8; invalid bytes replaced");
    }
    line
}
