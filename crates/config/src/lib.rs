//! Configuration loading, validation, and management for localchat.
//!
//! Loads configuration from `~/.localchat/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use localchat_core::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The root configuration structure.
///
/// Maps directly to `~/.localchat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Message sent automatically when the chat starts
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Conversation memory settings
    #[serde(default)]
    pub context: ContextConfig,

    /// Transcript log settings
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_model() -> String {
    "qwen2.5-coder:7b".into()
}
fn default_greeting() -> String {
    "你好".into()
}
fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Ignore HTTP(S)/ALL proxy settings when talking to the backend
    #[serde(default = "default_true")]
    pub bypass_proxy: bool,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    11434
}
fn default_timeout_secs() -> u64 {
    300
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            connect_timeout_secs: default_timeout_secs(),
            read_timeout_secs: default_timeout_secs(),
            bypass_proxy: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum transcript length kept between turns, in bytes
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_max_chars() -> usize {
    localchat_core::DEFAULT_MAX_CONTEXT_CHARS
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Transcript file, relative to the working directory unless absolute
    #[serde(default = "default_history_path")]
    pub path: PathBuf,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("chat_history.txt")
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_history_path(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, then apply environment overrides:
    /// - `LOCALCHAT_MODEL`
    /// - `LOCALCHAT_HOST`
    /// - `LOCALCHAT_PORT`
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Split out so tests don't
    /// touch the process environment.
    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("LOCALCHAT_MODEL") {
            self.model = model;
        }

        if let Some(host) = lookup("LOCALCHAT_HOST") {
            self.backend.host = host;
        }

        if let Some(port) = lookup("LOCALCHAT_PORT") {
            self.backend.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("LOCALCHAT_PORT is not a valid port: {port}"))
            })?;
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".localchat")
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationError("model must not be empty".into()));
        }

        if self.backend.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("backend.host must not be empty".into()));
        }

        if self.backend.port == 0 {
            return Err(ConfigError::ValidationError("backend.port must be > 0".into()));
        }

        if self.backend.connect_timeout_secs == 0 || self.backend.read_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "backend timeouts must be > 0 seconds".into(),
            ));
        }

        if self.context.max_chars == 0 {
            return Err(ConfigError::ValidationError("context.max_chars must be > 0".into()));
        }

        Ok(())
    }

    /// The explicit transport settings handed to the HTTP client.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            host: self.backend.host.clone(),
            port: self.backend.port,
            connect_timeout: Duration::from_secs(self.backend.connect_timeout_secs),
            read_timeout: Duration::from_secs(self.backend.read_timeout_secs),
            bypass_proxy: self.backend.bypass_proxy,
        }
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            greeting: default_greeting(),
            backend: BackendConfig::default(),
            context: ContextConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "qwen2.5-coder:7b");
        assert_eq!(config.backend.port, 11434);
        assert_eq!(config.context.max_chars, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.backend.port, config.backend.port);
        assert_eq!(parsed.history.path, config.history.path);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
model = "llama3:8b"
[backend]
port = 8080
"#,
        )
        .unwrap();
        assert_eq!(config.model, "llama3:8b");
        assert_eq!(config.backend.port, 8080);
        assert_eq!(config.backend.host, "127.0.0.1");
        assert_eq!(config.backend.read_timeout_secs, 300);
        assert_eq!(config.greeting, "你好");
    }

    #[test]
    fn zero_context_rejected() {
        let mut config = AppConfig::default();
        config.context.max_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_model_rejected() {
        let config = AppConfig {
            model: "  ".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().model, "qwen2.5-coder:7b");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "greeting = \"hello\"\n[history]\nenabled = false\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.greeting, "hello");
        assert!(!config.history.enabled);
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("LOCALCHAT_MODEL", "mistral:7b"),
            ("LOCALCHAT_HOST", "10.0.0.5"),
            ("LOCALCHAT_PORT", "9000"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.model, "mistral:7b");
        assert_eq!(config.backend.host, "10.0.0.5");
        assert_eq!(config.backend.port, 9000);
    }

    #[test]
    fn bad_port_override_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|k| {
            (k == "LOCALCHAT_PORT").then(|| "not-a-port".to_string())
        });
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn transport_config_carries_timeouts() {
        let mut config = AppConfig::default();
        config.backend.read_timeout_secs = 42;
        let transport = config.transport_config();
        assert_eq!(transport.base_url(), "http://127.0.0.1:11434");
        assert_eq!(transport.read_timeout, Duration::from_secs(42));
        assert_eq!(transport.connect_timeout, Duration::from_secs(300));
        assert!(transport.bypass_proxy);
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("qwen2.5-coder:7b"));
        assert!(toml_str.contains("11434"));
    }
}
