//! localchat CLI: the main entry point.
//!
//! Commands:
//! - `chat`    Greeting exchange, then interactive chat (default)
//! - `models`  List models installed on the backend
//! - `doctor`  Diagnose the connection to the backend
//! - `init`    Write a default config file

use clap::{Parser, Subcommand};

mod commands;
mod repl;

use commands::Overrides;

/// Proxy variables cleared before any HTTP client exists.
const PROXY_VARS: [&str; 3] = ["HTTP_PROXY", "HTTPS_PROXY", "ALL_PROXY"];

#[derive(Parser)]
#[command(
    name = "localchat",
    about = "localchat: chat with a locally hosted model",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    overrides: Overrides,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the model (default)
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Skip the automatic greeting exchange
        #[arg(long)]
        no_greeting: bool,

        /// Override the maximum retained context, in bytes
        #[arg(long, value_name = "BYTES")]
        max_context: Option<usize>,
    },

    /// List models installed on the backend
    Models,

    /// Diagnose the connection to the backend
    Doctor,

    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    clear_proxy_env();

    let cli = Cli::parse();

    // Initialize tracing; stderr keeps the chat on stdout readable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let overrides = cli.overrides;
    let command = cli.command.unwrap_or(Commands::Chat {
        message: None,
        no_greeting: false,
        max_context: None,
    });

    runtime.block_on(async move {
        match command {
            Commands::Chat {
                message,
                no_greeting,
                max_context,
            } => commands::chat::run(&overrides, message, no_greeting, max_context).await,
            Commands::Models => commands::models::run(&overrides).await,
            Commands::Doctor => commands::doctor::run(&overrides).await,
            Commands::Init { force } => commands::init::run(&overrides, force).await,
        }
    })
}

fn clear_proxy_env() {
    for var in PROXY_VARS {
        // SAFETY: runs first in `main`, before the runtime or any other thread exists.
        unsafe { std::env::remove_var(var) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_chat() {
        let cli = Cli::parse_from(["localchat"]);
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn global_overrides_parse_after_subcommand() {
        let cli = Cli::parse_from([
            "localchat", "chat", "--model", "llama3:8b", "--port", "8080", "-m", "hi",
        ]);
        assert_eq!(cli.overrides.model.as_deref(), Some("llama3:8b"));
        assert_eq!(cli.overrides.port, Some(8080));
        match cli.command {
            Some(Commands::Chat { message, .. }) => assert_eq!(message.as_deref(), Some("hi")),
            _ => panic!("expected chat command"),
        }
    }
}
