pub mod chat;
pub mod doctor;
pub mod init;
pub mod models;

use clap::Args;
use localchat_config::{AppConfig, ConfigError};
use std::path::PathBuf;

/// Settings that can be overridden on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct Overrides {
    /// Path to the config file (default: ~/.localchat/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model to chat with
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Backend host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Backend port
    #[arg(long, global = true)]
    pub port: Option<u16>,
}

impl Overrides {
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(AppConfig::config_path)
    }

    /// Apply command-line values on top of a loaded config.
    pub fn apply(&self, mut config: AppConfig) -> Result<AppConfig, ConfigError> {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(host) = &self.host {
            config.backend.host = host.clone();
        }
        if let Some(port) = self.port {
            config.backend.port = port;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Load config file, environment, then command-line overrides.
pub fn load_config(overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let config = AppConfig::load_with_env(&overrides.config_path())?;
    overrides.apply(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_config_values() {
        let overrides = Overrides {
            model: Some("llama3:8b".into()),
            host: Some("192.168.1.20".into()),
            port: Some(8080),
            ..Overrides::default()
        };
        let config = overrides.apply(AppConfig::default()).unwrap();
        assert_eq!(config.model, "llama3:8b");
        assert_eq!(config.backend.host, "192.168.1.20");
        assert_eq!(config.backend.port, 8080);
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        let config = Overrides::default().apply(AppConfig::default()).unwrap();
        assert_eq!(config.model, "qwen2.5-coder:7b");
        assert_eq!(config.backend.port, 11434);
    }

    #[test]
    fn invalid_override_rejected() {
        let overrides = Overrides {
            port: Some(0),
            ..Overrides::default()
        };
        assert!(overrides.apply(AppConfig::default()).is_err());
    }

    #[test]
    fn explicit_config_path_wins() {
        let overrides = Overrides {
            config: Some(PathBuf::from("/tmp/custom.toml")),
            ..Overrides::default()
        };
        assert_eq!(overrides.config_path(), PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn load_config_reads_given_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = \"phi3:mini\"\n").unwrap();

        let overrides = Overrides {
            config: Some(path),
            ..Overrides::default()
        };
        let config = load_config(&overrides).unwrap();
        // LOCALCHAT_MODEL in the test environment would win over the file
        if std::env::var_os("LOCALCHAT_MODEL").is_none() {
            assert_eq!(config.model, "phi3:mini");
        }
    }
}
