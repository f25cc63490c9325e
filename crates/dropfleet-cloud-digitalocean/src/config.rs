//! Provider configuration from the environment

use crate::error::{DigitalOceanError, Result};

pub const API_TOKEN_ENV: &str = "DO_API_KEY";
pub const API_URL_ENV: &str = "DIGITALOCEAN_API_URL";
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com/v2";

/// Configuration for the DigitalOcean client
#[derive(Clone)]
pub struct DigitalOceanConfig {
    pub api_token: String,
    pub api_url: String,
}

impl DigitalOceanConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Create DigitalOceanConfig from environment variables
    ///
    /// - `DO_API_KEY` (required)
    /// - `DIGITALOCEAN_API_URL` (default: `https://api.digitalocean.com/v2`)
    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var(API_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| DigitalOceanError::MissingEnvVar(API_TOKEN_ENV.to_string()))?;

        let api_url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(DigitalOceanError::InvalidConfig(format!(
                "{} must be an http(s) URL, got '{}'",
                API_URL_ENV, api_url
            )));
        }

        Ok(Self {
            api_token: api_token.trim().to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

impl std::fmt::Debug for DigitalOceanConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanConfig")
            .field("api_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}
