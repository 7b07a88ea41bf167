//! Configuration types and loading
//!
//! The client only needs to know where the remote application lives and,
//! optionally, which credentials establish the session.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Remote data service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Base URL of the target application (e.g. `https://shop.example.com`)
    pub base_url: String,
    /// Username used to establish a session
    pub username: Option<String>,
    /// Password used to establish a session
    pub password: Option<String>,
    /// `$top` of a page request that sets no size of its own
    pub default_page_size: u32,
    /// Upper bound on a single service call
    pub request_timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            username: None,
            password: None,
            default_page_size: 25,
            request_timeout_seconds: 60,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not set: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ClientConfig {
    /// Create a configuration for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            base_url: base_url.into(),
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the session credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load a `.env` file (if any) and then read the environment
    pub fn from_dotenv() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!("No .env file loaded: {}", e);
        }
        Self::from_env()
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.base_url = lookup("MOST_DATA_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("MOST_DATA_URL".to_string()))?;
        config.username = lookup("MOST_DATA_USERNAME");
        config.password = lookup("MOST_DATA_PASSWORD");

        if let Some(size) = lookup("MOST_DATA_PAGE_SIZE") {
            config.default_page_size = size.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MOST_DATA_PAGE_SIZE".to_string(),
                message: format!("expected a non-negative integer, got '{}'", size),
            })?;
        }
        if let Some(timeout) = lookup("MOST_DATA_TIMEOUT") {
            config.request_timeout_seconds = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                key: "MOST_DATA_TIMEOUT".to_string(),
                message: format!("expected a number of seconds, got '{}'", timeout),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the base URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidValue {
            key: "base_url".to_string(),
            message: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                key: "base_url".to_string(),
                message: format!("unsupported scheme '{}'", other),
            }),
        }
    }

    /// Whether both username and password are configured
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }

    /// Join the base URL with a relative resource URL
    pub fn resolve(&self, relative_url: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), relative_url)
    }
}
