//! Error types for parlor

use thiserror::Error;

/// Result type alias for parlor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in parlor
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The credential environment variable was unset or empty.
    #[error("{0} not found in environment")]
    CredentialMissing(String),

    /// The agent client could not be constructed.
    #[error("agent client construction failed: {0}")]
    ClientConstruction(String),

    /// The agent client failed while producing a response.
    #[error("{0}")]
    AgentExecution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
