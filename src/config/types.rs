//! Core configuration types and loading.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP listener configuration.
    pub http: HttpConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Address to bind to (e.g., "0.0.0.0:8080").
    pub address: SocketAddr,
    /// Serve Prometheus metrics on `/metrics`.
    #[serde(default = "default_true")]
    pub metrics: bool,
}

/// Database configuration.
///
/// The SQLite file path stands in for the driver/host/name/credentials
/// tuple of a networked database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file, or `:memory:`.
    pub path: String,
    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection before failing.
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    /// Seconds an idle file-database connection is kept before closing.
    /// In-memory pools never close their connection.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    /// In-memory database with default pool settings.
    pub fn in_memory() -> Self {
        Self {
            path: ":memory:".to_string(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }

    /// Acquire timeout as a [`Duration`].
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Idle timeout as a [`Duration`].
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Whether this configuration points at an in-memory database.
    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

pub(super) fn default_true() -> bool {
    true
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_idle_timeout() -> u64 {
    60
}
