//! # Client Configuration
//!
//! Connection settings for the store API.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`COMFY_*`)
//! 2. Defaults (this file)

use std::time::Duration;

use url::Url;

use crate::error::{StoreError, StoreResult};

/// Public demo backend.
pub const DEFAULT_API_URL: &str = "https://strapi-store-server.onrender.com/api";

/// Request timeout when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Store API client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to.
    pub api_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `COMFY_API_URL`: Override the base URL
    /// - `COMFY_HTTP_TIMEOUT_SECS`: Override the request timeout (whole seconds)
    pub fn from_env() -> Self {
        let mut config = ClientConfig::default();

        if let Ok(api_url) = std::env::var("COMFY_API_URL") {
            if !api_url.trim().is_empty() {
                config.api_url = api_url;
            }
        }

        if let Ok(timeout) = std::env::var("COMFY_HTTP_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.trim().parse::<u64>() {
                config.timeout = Duration::from_secs(secs);
            }
        }

        config
    }

    /// Sets the base URL.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks the base URL and returns it without a trailing slash.
    pub fn base_url(&self) -> StoreResult<String> {
        let parsed = Url::parse(self.api_url.trim())
            .map_err(|e| StoreError::Config(format!("invalid API URL '{}': {}", self.api_url, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StoreError::Config(format!(
                "API URL must be http or https, got '{}'",
                parsed.scheme()
            )));
        }

        Ok(self.api_url.trim().trim_end_matches('/').to_string())
    }
}
