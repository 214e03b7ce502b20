//! Client error types

use thiserror::Error;

/// Errors that can occur when talking to the DataDash backend
#[derive(Error, Debug)]
pub enum ClientError {
    /// Connection refused or host unreachable
    #[error("DataDash API unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Body was received but did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classify a transport error the way callers care about it
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_connect() {
            ClientError::Unavailable
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Request(e)
        }
    }

    /// HTTP status, when the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
