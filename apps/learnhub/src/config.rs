//! # Server Configuration
//!
//! `ServerConfig` is assembled from four layers, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config <path>`)
//! 3. `LEARNHUB_*` environment variables
//! 4. explicit CLI flags (applied by the `server` command)
//!
//! ## Environment Variables
//!
//! - `LEARNHUB_HOST`: bind address (default `127.0.0.1`)
//! - `LEARNHUB_PORT`: bind port (default `5000`)
//! - `LEARNHUB_CORS_ORIGINS`: comma-separated origins, or `*` for any
//! - `LEARNHUB_BODY_LIMIT`: maximum request body in bytes (default 2 MiB)
//! - `LEARNHUB_LOG_FORMAT`: `text` or `json`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default request body limit: 2 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for `ServerConfig`.
    #[error("failed to parse config file '{}': {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// An environment variable holds an unusable value.
    #[error("invalid {var}='{value}': {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
}

// =============================================================================
// LOG FORMAT
// =============================================================================

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

// =============================================================================
// SERVER CONFIG
// =============================================================================

/// Everything the HTTP server needs besides the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means localhost only; `["*"]` allows any.
    pub cors_origins: Vec<String>,
    pub body_limit_bytes: usize,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            cors_origins: Vec::new(),
            body_limit_bytes: DEFAULT_BODY_LIMIT,
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    /// Defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides(|var| std::env::var(var).ok())
    }

    /// Read a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `LEARNHUB_*` overrides read through `lookup`.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("LEARNHUB_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("LEARNHUB_PORT") {
            self.port = parse_env("LEARNHUB_PORT", port)?;
        }
        if let Some(origins) = lookup("LEARNHUB_CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(limit) = lookup("LEARNHUB_BODY_LIMIT") {
            self.body_limit_bytes = parse_env("LEARNHUB_BODY_LIMIT", limit)?;
        }
        if let Some(format) = lookup("LEARNHUB_LOG_FORMAT") {
            self.log_format = parse_env("LEARNHUB_LOG_FORMAT", format)?;
        }
        Ok(self)
    }

    /// Apply flags given on the command line.
    #[must_use]
    pub fn with_cli_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_env<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::InvalidEnv {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

// =============================================================================
// TESTS
// =============================================================================
