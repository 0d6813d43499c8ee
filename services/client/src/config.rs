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
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: Url,
    pub session_file: PathBuf,
    pub request_timeout: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// A `.env` file in the current directory is honored outside of tests.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Remote service ---
        let api_url_str = lookup("ICEBREAKER_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("ICEBREAKER_API_URL".to_string()))?;
        let api_base_url = Url::parse(api_url_str.trim()).map_err(|e| {
            ConfigError::InvalidValue("ICEBREAKER_API_URL".to_string(), e.to_string())
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue(
                "ICEBREAKER_API_URL".to_string(),
                format!("'{}' cannot be used as a base URL", api_url_str),
            ));
        }

        let timeout_str = lookup("ICEBREAKER_TIMEOUT_SECS").unwrap_or_else(|| "10".to_string());
        let request_timeout = timeout_str
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "ICEBREAKER_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                )
            })?;

        // --- Local state ---
        let session_file = lookup("ICEBREAKER_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./.icebreaker/session.json"));

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_base_url,
            session_file,
            request_timeout,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("ICEBREAKER_API_URL", "http://localhost:8000")]).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.session_file, PathBuf::from("./.icebreaker/session.json"));
        assert_eq!(config.log_level, Level::WARN);
    }

    #[test]
    fn api_url_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingVar(v)) if v == "ICEBREAKER_API_URL"));
    }

    #[test]
    fn bad_values_are_rejected() {
        let err = load(&[("ICEBREAKER_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(v, _) if v == "ICEBREAKER_API_URL"));

        let err = load(&[
            ("ICEBREAKER_API_URL", "http://localhost"),
            ("ICEBREAKER_TIMEOUT_SECS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(v, _) if v == "ICEBREAKER_TIMEOUT_SECS"));

        let err = load(&[("ICEBREAKER_API_URL", "http://localhost"), ("RUST_LOG", "chatty")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(v, _) if v == "RUST_LOG"));
    }
}
