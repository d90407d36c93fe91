//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::Result;

/// Fallback port when neither the config file nor the environment names one.
pub const DEFAULT_PORT: u16 = 7860;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Agent backend to use (currently only "anthropic")
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_credential_env")]
    pub credential_env: String,

    /// Construct the agent client at startup instead of on the first message
    #[serde(default)]
    pub eager_init: bool,

    /// Address the web front-end binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port override for the web front-end
    #[serde(default)]
    pub port: Option<u16>,
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_credential_env() -> String {
    "ANTHROPIC_API_KEY".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            credential_env: default_credential_env(),
            eager_init: false,
            host: default_host(),
            port: None,
        }
    }
}

impl Config {
    /// Port the web front-end should listen on.
    ///
    /// Precedence: config file / CLI override, then `$PORT`, then
    /// `$WEBSITES_PORT`, then [`DEFAULT_PORT`].
    pub fn resolve_port(&self) -> u16 {
        self.port.or_else(port_from_env).unwrap_or(DEFAULT_PORT)
    }
}

fn port_from_env() -> Option<u16> {
    ["PORT", "WEBSITES_PORT"]
        .iter()
        .find_map(|var| std::env::var(var).ok().and_then(|v| v.parse().ok()))
}

/// Get the config directory path
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".parlor")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Load configuration from the default location.
///
/// A missing file is not an error: the front-end should come up with
/// defaults and report any agent problem per request.
pub fn load() -> Result<Config> {
    load_from(&config_path())
}

/// Load configuration from a specific file.
pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to the default location.
pub fn save(config: &Config) -> Result<()> {
    save_to(config, &config_path())
}

/// Save configuration to a specific file.
pub fn save_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Interactive setup wizard.
pub fn onboard() -> Result<()> {
    use inquire::{Confirm, Select, Text};

    println!("Welcome! Let's get parlor configured.\n");

    let mut config = Config::default();

    let providers = vec!["Anthropic (API key)"];
    let _choice = Select::new("Choose your agent backend:", providers)
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    config.provider = "anthropic".to_string();

    let model = Text::new("Model to use:")
        .with_default(&config.model)
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    config.model = model;

    let credential_env = Text::new("Environment variable holding your API key:")
        .with_default(&config.credential_env)
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;
    config.credential_env = credential_env;

    config.eager_init = Confirm::new("Construct the agent client at startup?")
        .with_default(false)
        .with_help_message("Default is lazy: the client is built on the first message")
        .prompt()
        .map_err(|e| Error::Config(format!("Prompt failed: {}", e)))?;

    save(&config)?;

    println!();
    println!("✓ Configuration saved to {:?}", config_path());
    println!("  Make sure {} is set before chatting.", config.credential_env);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider, "anthropic");
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.credential_env, "ANTHROPIC_API_KEY");
        assert!(!config.eager_init);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.credential_env, config.credential_env);
    }

    #[test]
    fn test_port_override_wins() {
        let config = Config {
            port: Some(9000),
            ..Config::default()
        };
        assert_eq!(config.resolve_port(), 9000);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.provider, "anthropic");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            model: "claude-test".to_string(),
            eager_init: true,
            port: Some(8080),
            ..Config::default()
        };
        save_to(&config, &path).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.model, "claude-test");
        assert!(loaded.eager_init);
        assert_eq!(loaded.port, Some(8080));
    }
}
