//! `localchat models`: List models installed on the backend.

use localchat_core::Transport;
use localchat_providers::OllamaTransport;

use super::Overrides;

pub async fn run(overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(overrides)?;
    let transport = OllamaTransport::new(&config.transport_config())?;

    let models = transport.list_models().await?;
    if models.is_empty() {
        println!("No models installed on {}.", transport.base_url());
        println!("Pull one with: ollama pull {}", config.model);
        return Ok(());
    }

    println!("Models on {}:", transport.base_url());
    for name in &models {
        let marker = if *name == config.model { "*" } else { " " };
        println!("  {marker} {name}");
    }

    Ok(())
}
