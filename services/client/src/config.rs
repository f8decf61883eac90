//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Origin of the ezChef backend; request paths already start with `/api`.
    pub api_url: Url,
    pub session_file: PathBuf,
    /// Used for `X-CSRFToken` when the cookie jar holds no `csrftoken`.
    pub csrf_token: Option<String>,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Backend Location ---
        let api_url_str =
            std::env::var("EZCHEF_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
        let api_url = Url::parse(&api_url_str)
            .map_err(|e| ConfigError::InvalidValue("EZCHEF_API_URL".to_string(), e.to_string()))?;

        // --- Session Persistence ---
        let session_file = std::env::var("EZCHEF_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./.ezchef-session.json"));

        let csrf_token = std::env::var("EZCHEF_CSRF_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        // --- Transport and Logging ---
        let timeout_str = std::env::var("EZCHEF_TIMEOUT_SECS").unwrap_or_else(|_| "30".to_string());
        let timeout_secs = timeout_str.parse::<u64>().map_err(|_| {
            ConfigError::InvalidValue(
                "EZCHEF_TIMEOUT_SECS".to_string(),
                format!("'{}' is not a whole number of seconds", timeout_str),
            )
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_url,
            session_file,
            csrf_token,
            request_timeout: Duration::from_secs(timeout_secs),
            log_level,
        })
    }

    /// A configuration pointing at `api_url` with every other setting defaulted.
    pub fn for_api_url(api_url: Url) -> Self {
        Self {
            api_url,
            session_file: PathBuf::from("./.ezchef-session.json"),
            csrf_token: None,
            request_timeout: Duration::from_secs(30),
            log_level: Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_numeric_timeout() {
        std::env::set_var("EZCHEF_TIMEOUT_SECS", "soon");
        let result = Config::from_env();
        std::env::remove_var("EZCHEF_TIMEOUT_SECS");

        match result {
            Err(ConfigError::InvalidValue(var, _)) => assert_eq!(var, "EZCHEF_TIMEOUT_SECS"),
            other => panic!("expected invalid timeout, got {:?}", other),
        }
    }
}
