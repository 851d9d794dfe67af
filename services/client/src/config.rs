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
    /// Base URL of the recipe backend, without a trailing `/`.
    pub api_url: Url,
    pub log_level: Level,
    /// Replaces the bundled offline dataset when set.
    pub offline_recipes_path: Option<PathBuf>,
    pub reachability_timeout: Duration,
    /// `host:port` probed for connectivity instead of the backend itself.
    pub reachability_addr: Option<(String, u16)>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Backend ---
        let api_url_str = lookup("RECIPE_API_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingVar("RECIPE_API_URL".to_string()))?;
        let api_url = parse_api_url(api_url_str.trim())?;

        // --- Logging ---
        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Offline fallback ---
        let offline_recipes_path = lookup("OFFLINE_RECIPES_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let timeout_str =
            lookup("REACHABILITY_TIMEOUT_MS").unwrap_or_else(|| "1500".to_string());
        let timeout_ms = timeout_str.trim().parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue("REACHABILITY_TIMEOUT_MS".to_string(), e.to_string())
        })?;

        let reachability_addr = lookup("REACHABILITY_ADDR")
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_host_port(v.trim()))
            .transpose()?;

        Ok(Self {
            api_url,
            log_level,
            offline_recipes_path,
            reachability_timeout: Duration::from_millis(timeout_ms),
            reachability_addr,
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue("RECIPE_API_URL".to_string(), reason);

    let url = Url::parse(raw.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

fn parse_host_port(raw: &str) -> Result<(String, u16), ConfigError> {
    let invalid =
        |reason: String| ConfigError::InvalidValue("REACHABILITY_ADDR".to_string(), reason);

    let (host, port) = raw
        .rsplit_once(':')
        .ok_or_else(|| invalid(format!("'{}' is not host:port", raw)))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(invalid("missing host".to_string()));
    }
    let port = port.parse::<u16>().map_err(|e| invalid(e.to_string()))?;
    Ok((host.to_string(), port))
}
