//! Environment-driven core configuration.
//!
//! # Invariants
//! - Unset variables fall back to defaults; set-but-invalid values are errors.
//! - `api_url` never ends with `/`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::logging::default_log_level;

pub const ENV_API_URL: &str = "FEEDBOOK_API_URL";
pub const ENV_DB_PATH: &str = "FEEDBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "FEEDBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FEEDBOOK_LOG_DIR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "FEEDBOOK_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/feedbacks";
pub const DEFAULT_DB_FILE_NAME: &str = "feedbook.sqlite3";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
    #[error("{var} must start with http:// or https://, got `{value}`")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must be a positive number of seconds, got `{value}`")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Settings shared by the note store, remote client and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Remote collection endpoint, e.g. `http://host:8080/api/feedbacks`.
    pub api_url: String,
    /// SQLite file holding the local note collection.
    pub db_path: PathBuf,
    pub log_level: String,
    /// File logging is disabled when unset.
    pub log_dir: Option<PathBuf>,
    pub http_timeout: Duration,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = normalize_api_url(&url)?;
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            let trimmed = path.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::Empty { var: ENV_DB_PATH });
            }
            config.db_path = PathBuf::from(trimmed);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|value| !value.trim().is_empty()) {
            config.log_level = level.trim().to_string();
        }
        config.log_dir = lookup(ENV_LOG_DIR)
            .map(|dir| dir.trim().to_string())
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT_SECS) {
            config.http_timeout = parse_timeout(&raw)?;
        }

        Ok(config)
    }
}

/// Validates and trims a collection endpoint URL.
pub fn normalize_api_url(url: &str) -> Result<String, ConfigError> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Empty { var: ENV_API_URL });
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl {
            var: ENV_API_URL,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            var: ENV_HTTP_TIMEOUT_SECS,
            value: raw.to_string(),
        }),
    }
}
