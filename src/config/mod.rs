//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::aggregate::AggregateOptions;
use crate::models::{default_games, Game};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// start.gg API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartggConfig {
    /// GraphQL endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable holding the bearer token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Standings requested per event (the "top players" list length)
    #[serde(default = "default_standings_per_event")]
    pub standings_per_event: u32,
}

fn default_api_url() -> String {
    "https://api.start.gg/gql/alpha".to_string()
}

fn default_token_env() -> String {
    "START_GG_API_TOKEN".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_standings_per_event() -> u32 {
    8
}

impl Default for StartggConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            timeout_seconds: default_timeout(),
            standings_per_event: default_standings_per_event(),
        }
    }
}

impl StartggConfig {
    /// Read the token from the configured environment variable.
    ///
    /// Called once at startup; the value is handed to the client explicitly.
    pub fn token_from_env(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub startgg: StartggConfig,

    #[serde(default)]
    pub aggregate: AggregateOptions,

    #[serde(default = "default_games")]
    pub games: Vec<Game>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            startgg: StartggConfig::default(),
            aggregate: AggregateOptions::default(),
            games: default_games(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            info!("Loading config from {}", path.display());
            Self::from_file(path)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.startgg.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "start.gg timeout must be greater than 0".to_string(),
            ));
        }

        match Url::parse(&self.startgg.api_url) {
            Ok(url) if url.scheme() == "https" || url.scheme() == "http" => {}
            Ok(url) => {
                return Err(ConfigError::ValidationError(format!(
                    "start.gg api_url must be http(s), got {}",
                    url.scheme()
                )))
            }
            Err(e) => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid start.gg api_url: {}",
                    e
                )))
            }
        }

        if self.startgg.standings_per_event == 0 || self.startgg.standings_per_event > 64 {
            return Err(ConfigError::ValidationError(
                "standings_per_event must be between 1 and 64".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.aggregate.top_n == 0 {
            return Err(ConfigError::ValidationError(
                "aggregate.top_n must be greater than 0".to_string(),
            ));
        }

        if self.games.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one game must be configured".to_string(),
            ));
        }

        let mut slugs = HashSet::new();
        for game in &self.games {
            if !slugs.insert(game.slug.to_lowercase()) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate game slug: {}",
                    game.slug
                )));
            }
        }

        Ok(())
    }
}
