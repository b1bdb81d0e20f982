//! Configuration loading and management.
//!
//! The Discord token is a secret and comes exclusively from the `TOKEN`
//! environment variable; its absence is a fatal startup error. The optional
//! `config.toml` covers everything else (currently the command prefix) and
//! may be missing entirely.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the Discord bot token.
const TOKEN_VAR: &str = "TOKEN";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("missing TOKEN environment variable")]
    MissingToken,
}

/// Bot configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Bot behavior settings.
    #[serde(default)]
    pub bot: BotConfig,
}

/// Bot behavior settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Trigger prefix. A message is a command invocation iff its content is
    /// the prefix, a space, then the command line.
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "!k".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the defaults; an unreadable or malformed file
    /// is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Read the Discord bot token from the environment.
    pub fn token() -> Result<String, ConfigError> {
        std::env::var(TOKEN_VAR).map_err(|_| ConfigError::MissingToken)
    }
}
