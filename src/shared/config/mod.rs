//! Server configuration
//!
//! Configuration is read from an optional TOML file named by `CONFIG_PATH`
//! and then overridden by environment variables. Every field has a default
//! suitable for local development.
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `SERVER_PORT` | `port` | `8003` |
//! | `DATABASE_URL` | `database_url` | unset (in-memory stores) |
//! | `JWT_SECRET` | `jwt_secret` | development secret |
//! | `TOKEN_TTL_SECS` | `token_ttl_secs` | `3600` |
//! | `UPLOAD_DIR` | `upload_dir` | `files` |
//! | `COMPENSATE_PARTIAL_FAILURES` | `compensate_partial_failures` | `true` |
//! | `BCRYPT_COST` | `bcrypt_cost` | `12` |

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Secret used when neither the file nor the environment provides one
pub const DEVELOPMENT_JWT_SECRET: &str = "confab-development-secret-change-me";

/// Server configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// TCP port the HTTP server binds to
    pub port: u16,
    /// PostgreSQL connection string; `None` selects the in-memory stores
    pub database_url: Option<String>,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Directory where image attachments are written
    pub upload_dir: PathBuf,
    /// Undo completed writes when a later write of the same relationship
    /// operation fails
    pub compensate_partial_failures: bool,
    /// bcrypt work factor for password hashes
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            database_url: None,
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            token_ttl_secs: 3600,
            upload_dir: PathBuf::from("files"),
            compensate_partial_failures: true,
            bcrypt_cost: 12,
        }
    }
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from `CONFIG_PATH` (if set) and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        if config.jwt_secret == DEVELOPMENT_JWT_SECRET {
            tracing::warn!("JWT_SECRET not set, using the development secret");
        }
        Ok(config)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse TOML configuration; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from a key lookup (normally the process environment)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("SERVER_PORT") {
            self.port = parse_value("SERVER_PORT", &port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = Some(url).filter(|u| !u.trim().is_empty());
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_SECS") {
            self.token_ttl_secs = parse_value("TOKEN_TTL_SECS", &ttl)?;
        }
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("COMPENSATE_PARTIAL_FAILURES") {
            self.compensate_partial_failures = parse_value("COMPENSATE_PARTIAL_FAILURES", &flag)?;
        }
        if let Some(cost) = lookup("BCRYPT_COST") {
            self.bcrypt_cost = parse_value("BCRYPT_COST", &cost)?;
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "port",
                message: "must be non-zero".to_string(),
            });
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if self.token_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "token_ttl_secs",
                message: "must be non-zero".to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                key: "bcrypt_cost",
                message: format!("{} is outside 4..=31", self.bcrypt_cost),
            });
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        message: format!("cannot parse '{}'", raw),
    })
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the listening port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Use PostgreSQL at the given URL
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = Some(url.into());
        self
    }

    /// Set the token signing secret
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    /// Set the token lifetime
    pub fn token_ttl_secs(mut self, secs: u64) -> Self {
        self.config.token_ttl_secs = secs;
        self
    }

    /// Set the attachment directory
    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = dir.into();
        self
    }

    /// Enable or disable compensation after partial failures
    pub fn compensate_partial_failures(mut self, enabled: bool) -> Self {
        self.config.compensate_partial_failures = enabled;
        self
    }

    /// Set the bcrypt work factor
    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.config.bcrypt_cost = cost;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot read config file {path:?}: {message}")]
    Io { path: PathBuf, message: String },
    #[error("invalid config file: {0}")]
    Parse(String),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
}
