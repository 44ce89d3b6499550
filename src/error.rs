// src/error.rs
use thiserror::Error;

/// Failure talking to the extraction service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Non-2xx answer carrying an `error` field
    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error("No document has been uploaded yet")]
    NoDocument,

    #[error("The selected file is empty")]
    EmptyFile,
}
