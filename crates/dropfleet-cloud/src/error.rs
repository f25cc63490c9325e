//! Cloud provider error types

use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("{endpoint} returned {status}: {message}")]
    Api {
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Broad classification of a [`CloudError`].
///
/// Workflows decide per kind whether a failure aborts the run or is
/// recorded against a single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential, bad flag or out-of-range argument
    Configuration,
    /// Connection, DNS or TLS failure
    Transport,
    /// Response body did not have the expected shape
    Decode,
    /// Provider answered with a non-success status
    Application,
    /// Local file system, key material or ledger format
    Local,
}

impl CloudError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CloudError::Configuration(_) | CloudError::InvalidRequest(_) => {
                ErrorKind::Configuration
            }
            CloudError::Transport(_) => ErrorKind::Transport,
            CloudError::Decode { .. } => ErrorKind::Decode,
            CloudError::Api { .. } => ErrorKind::Application,
            CloudError::KeyGeneration(_)
            | CloudError::Ledger(_)
            | CloudError::Io(_)
            | CloudError::Json(_) => ErrorKind::Local,
        }
    }

    /// Whether a batch may log this error and move on to the next item
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Application
    }

    /// HTTP status carried by an application error
    pub fn status(&self) -> Option<u16> {
        match self {
            CloudError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
