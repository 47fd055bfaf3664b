//! Configuration types for the Rolodex admin backend.
//!
//! Configuration is loaded from a YAML file; every field carries a serde
//! default so a partial file (or no file at all) still yields a complete,
//! runnable configuration. The server binary layers CLI flags and
//! environment variables on top of the loaded values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Complete Rolodex configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RolodexConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage engine settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token authority settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Strategy used to gate ad-hoc queries.
    #[serde(default)]
    pub query_gate: GateKind,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Storage engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite:crm.db`.
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Token authority settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret for session tokens.
    #[serde(default = "default_secret")]
    pub secret: String,

    /// Lifetime of issued tokens, in minutes.
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            token_ttl_minutes: default_token_ttl_minutes(),
        }
    }
}

/// Which check ad-hoc queries must pass before execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    /// Case-insensitive `SELECT` prefix check.
    #[default]
    Prefix,

    /// Full parse; only a single SELECT statement is accepted.
    Parse,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_database_url() -> String {
    "sqlite:crm.db".to_string()
}

fn default_secret() -> String {
    "your-secret-key-here".to_string()
}

fn default_token_ttl_minutes() -> u64 {
    30
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RolodexConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.secret.is_empty() {
            return Err(ConfigError::Config(
                "auth.secret must not be empty".to_string(),
            ));
        }
        if self.auth.token_ttl_minutes == 0 {
            return Err(ConfigError::Config(
                "auth.token_ttl_minutes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
