//! Transport error types

use thiserror::Error;

/// Errors from the LLM transport; any of these ends the run
#[derive(Error, Debug)]
pub enum TransportError {
    /// Network/HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Credentials rejected (401/403)
    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Any other non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Auth { status, message },
            _ => Self::Api { status, message },
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;
