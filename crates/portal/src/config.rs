//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FOODWASTE_DATA_DIR` - Directory holding the file-backed session slot (default: .foodwaste)
//! - `FOODWASTE_SEED_DEMO_REQUESTS` - Seed the demo applications into the review queue (default: true)
//! - `FOODWASTE_LOG_FORMAT` - `text` or `json` (default: text)
//!
//! The administrator credential pair is fixed and has no variable.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
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
            other => Err(format!("expected `text` or `json`, got `{other}`")),
        }
    }
}

/// Portal configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    /// Directory of the file-backed session slot
    pub data_dir: PathBuf,
    /// Whether a fresh review queue gets the demo applications
    pub seed_demo_requests: bool,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".foodwaste"),
            seed_demo_requests: true,
            log_format: LogFormat::Text,
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`PortalConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("FOODWASTE_DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or(defaults.data_dir, PathBuf::from);

        let seed_demo_requests = match lookup("FOODWASTE_SEED_DEMO_REQUESTS") {
            Some(value) => parse_bool(&value)
                .map_err(|e| invalid("FOODWASTE_SEED_DEMO_REQUESTS", e))?,
            None => defaults.seed_demo_requests,
        };

        let log_format = match lookup("FOODWASTE_LOG_FORMAT") {
            Some(value) => value
                .parse::<LogFormat>()
                .map_err(|e| invalid("FOODWASTE_LOG_FORMAT", e))?,
            None => defaults.log_format,
        };

        Ok(Self {
            data_dir,
            seed_demo_requests,
            log_format,
        })
    }
}

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason)
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got `{other}`")),
    }
}
