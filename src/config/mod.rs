//! Configuration loading and management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors raised while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server binds to
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Page-size bounds for every table view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page when the request does not specify a limit
    pub default_page_size: usize,

    /// Upper bound for a requested limit
    pub max_page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

/// Longest accepted session lifetime: one year
pub const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Session lifetime settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minutes a session stays valid after login
    pub ttl_minutes: i64,

    /// Seconds between sweeps that drop expired sessions
    pub purge_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 480,
            purge_interval_seconds: 60,
        }
    }
}

impl SessionConfig {
    /// Session lifetime, clamped to `1..=MAX_TTL_MINUTES`
    pub fn ttl(&self) -> chrono::TimeDelta {
        let minutes = self.ttl_minutes.clamp(1, MAX_TTL_MINUTES);
        chrono::TimeDelta::try_minutes(minutes).unwrap_or(chrono::TimeDelta::zero())
    }

    pub fn purge_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.purge_interval_seconds.max(1))
    }
}

/// Complete configuration for the marketplace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub server: ServerConfig,

    pub tables: TableConfig,

    pub sessions: SessionConfig,

    /// Dataset file replacing the embedded seed data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
}

impl MarketConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tables.default_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "tables.default_page_size",
                message: "must be at least 1".to_string(),
            });
        }
        if self.tables.max_page_size < self.tables.default_page_size {
            return Err(ConfigError::Invalid {
                field: "tables.max_page_size",
                message: format!(
                    "{} is below default_page_size {}",
                    self.tables.max_page_size, self.tables.default_page_size
                ),
            });
        }
        if self.sessions.ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                field: "sessions.ttl_minutes",
                message: "must be positive".to_string(),
            });
        }
        if self.sessions.ttl_minutes > MAX_TTL_MINUTES {
            return Err(ConfigError::Invalid {
                field: "sessions.ttl_minutes",
                message: format!(
                    "{} exceeds the one-year limit of {} minutes",
                    self.sessions.ttl_minutes, MAX_TTL_MINUTES
                ),
            });
        }
        if self.sessions.purge_interval_seconds == 0 {
            return Err(ConfigError::Invalid {
                field: "sessions.purge_interval_seconds",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
