//! DigitalOcean provider error types

use dropfleet_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigitalOceanError {
    #[error("Environment variable {0} is not set")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{endpoint} returned {status}: {message}")]
    Api {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Unexpected {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, DigitalOceanError>;

impl From<DigitalOceanError> for CloudError {
    fn from(err: DigitalOceanError) -> Self {
        match err {
            DigitalOceanError::MissingEnvVar(var) => {
                CloudError::Configuration(format!("environment variable {} is not set", var))
            }
            DigitalOceanError::InvalidConfig(msg) => CloudError::Configuration(msg),
            DigitalOceanError::Request(e) if e.is_builder() => {
                CloudError::Configuration(format!("invalid request: {}", e))
            }
            DigitalOceanError::Request(e) if e.is_decode() => CloudError::Decode {
                endpoint: e
                    .url()
                    .map(|u| u.path().to_string())
                    .unwrap_or_default(),
                message: e.to_string(),
            },
            DigitalOceanError::Request(e) => CloudError::Transport(e.to_string()),
            DigitalOceanError::Api {
                endpoint,
                status,
                message,
            } => CloudError::Api {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            },
            DigitalOceanError::Decode { endpoint, source } => CloudError::Decode {
                endpoint: endpoint.to_string(),
                message: source.to_string(),
            },
        }
    }
}
