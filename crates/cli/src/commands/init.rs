//! `localchat init`: Write the default config file.

use localchat_config::AppConfig;
use std::path::Path;

use super::Overrides;

pub async fn run(overrides: &Overrides, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = overrides.config_path();
    if write_default_config(&path, force)? {
        println!("✅ Wrote default config: {}", path.display());
    } else {
        println!("  Config file exists: {} (use --force to overwrite)", path.display());
    }
    Ok(())
}

/// Returns `false` when the file already exists and `force` is off.
fn write_default_config(path: &Path, force: bool) -> std::io::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, AppConfig::default_toml())?;
    Ok(true)
}
