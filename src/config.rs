//! Runtime configuration.
//!
//! Values are resolved from, lowest to highest precedence:
//! built-in defaults, an optional TOML file, a `.env` file and the process
//! environment.
//!
//! ## Environment Variables
//! - `API_KEY`: Bearer credential for the completion endpoint (required)
//! - `API_URL`: Chat-completions URL
//! - `MODEL`: Model identifier
//! - `MAX_TOKENS`, `TEMPERATURE`: Generation parameters
//! - `MAX_RETRIES`, `RETRY_DELAY_MS`, `REQUEST_TIMEOUT_SECONDS`: Retry budget and timeouts
//! - `AURALIS_DATA_DIR`: Directory for the local key/value slots
//! - `ARCHIVE_URL`: Optional document-store collection URL
//! - `AURALIS_CONFIG`: Path to a TOML file loaded before the variables above

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://api.mistral.ai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "mistral-large-latest";
pub const PRODUCT_NAME: &str = "Auralis";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variables: {0}")]
    MissingVariables(String),

    #[error("Invalid URL for {key}: {value}")]
    InvalidUrl { key: String, value: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_seconds: u64,
    pub data_dir: PathBuf,
    pub product_name: String,
    pub archive_url: Option<String>,
    pub user: UserProfile,
}

/// Identity attached to remote archive records.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.7,
            max_attempts: 3,
            retry_delay_ms: 1000,
            request_timeout_seconds: 60,
            data_dir: PathBuf::from(".auralis"),
            product_name: PRODUCT_NAME.to_string(),
            archive_url: None,
            user: UserProfile::default(),
        }
    }
}

impl Config {
    /// Resolves the full configuration from file, `.env` and environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var("AURALIS_CONFIG") {
            Ok(path) => Self::from_toml_file(&path)?,
            Err(_) => Self::default(),
        };

        config
            .apply_env(|key| std::env::var(key).ok())
            .context("applying environment overrides")?;
        config.validate().context("validating configuration")?;

        info!(
            api_url = %config.api_url,
            model = %config.model,
            max_attempts = config.max_attempts,
            data_dir = %config.data_dir.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(path = %path.display(), "Loaded TOML configuration");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Overrides fields from a variable lookup. Unset variables leave the
    /// current value in place.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = lookup("MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("MAX_TOKENS") {
            self.max_tokens = parse_var("MAX_TOKENS", &v)?;
        }
        if let Some(v) = lookup("TEMPERATURE") {
            self.temperature = parse_var("TEMPERATURE", &v)?;
        }
        if let Some(v) = lookup("MAX_RETRIES") {
            self.max_attempts = parse_var("MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("RETRY_DELAY_MS") {
            self.retry_delay_ms = parse_var("RETRY_DELAY_MS", &v)?;
        }
        if let Some(v) = lookup("REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = parse_var("REQUEST_TIMEOUT_SECONDS", &v)?;
        }
        if let Some(v) = lookup("AURALIS_DATA_DIR") {
            self.data_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("ARCHIVE_URL") {
            self.archive_url = Some(v).filter(|url| !url.trim().is_empty());
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("API_URL", &self.api_url)?;
        if let Some(archive_url) = &self.archive_url {
            check_url("ARCHIVE_URL", archive_url)?;
        }

        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingVariables("API_KEY".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_RETRIES".to_string(),
                value: self.max_attempts.to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                key: "TEMPERATURE".to_string(),
                value: self.temperature.to_string(),
            });
        }
        Ok(())
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_retry_policy(mut self, max_attempts: u32, retry_delay_ms: u64) -> Self {
        self.max_attempts = max_attempts;
        self.retry_delay_ms = retry_delay_ms;
        self
    }

    pub fn with_archive_url(mut self, archive_url: impl Into<String>) -> Self {
        self.archive_url = Some(archive_url.into());
        self
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = user;
        self
    }
}

/// Reports which required variables are absent from the process environment.
pub fn validate_environment() -> Result<(), ConfigError> {
    dotenv::dotenv().ok();

    let missing: Vec<&str> = ["API_KEY"]
        .into_iter()
        .filter(|var| std::env::var(var).is_err())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingVariables(missing.join(", ")))
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn check_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
        key: key.to_string(),
        value: value.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}
