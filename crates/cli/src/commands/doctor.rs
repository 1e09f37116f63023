//! `localchat doctor`: Diagnose the connection to the backend.

use localchat_core::Transport;
use localchat_providers::OllamaTransport;

use super::Overrides;
use crate::repl::DIAGNOSTIC_HINTS;

pub async fn run(overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 localchat doctor: Connection Diagnostics");
    println!("============================================\n");

    let mut issues = 0;

    let config_path = overrides.config_path();
    let config = match super::load_config(overrides) {
        Ok(config) => {
            if config_path.exists() {
                println!("  ✅ Config file valid: {}", config_path.display());
            } else {
                println!("  ⚠️  No config file at {}, using defaults", config_path.display());
            }
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config file and run doctor again.");
            return Ok(());
        }
    };

    if config.backend.bypass_proxy {
        println!("  ✅ Proxy settings ignored for backend requests");
    } else {
        println!("  ⚠️  Proxy settings honored: a proxy may intercept local requests");
    }

    let transport = OllamaTransport::new(&config.transport_config())?;
    let mut reachable = false;
    match transport.health_check().await {
        Ok(true) => {
            println!("  ✅ Backend reachable at {}", transport.base_url());
            reachable = true;
        }
        Ok(false) => {
            println!("  ⚠️  {} answered, but not like an Ollama server", transport.base_url());
            issues += 1;
        }
        Err(e) => {
            println!("  ❌ Cannot reach {}: {e}", transport.base_url());
            issues += 1;
        }
    }

    if reachable {
        match transport.list_models().await {
            Ok(models) if models.iter().any(|m| *m == config.model) => {
                println!("  ✅ Model '{}' installed", config.model);
            }
            Ok(_) => {
                println!(
                    "  ❌ Model '{}' not installed: run `ollama pull {}`",
                    config.model, config.model
                );
                issues += 1;
            }
            Err(e) => {
                println!("  ⚠️  Could not list models: {e}");
                issues += 1;
            }
        }
    }

    if config.history.enabled {
        println!("  ✅ Transcript log: {}", config.history.path.display());
    } else {
        println!("  ⚠️  Transcript log disabled");
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
        if !reachable {
            print!("{DIAGNOSTIC_HINTS}");
        }
    }

    Ok(())
}
