//! Error types for remote API calls.

use thiserror::Error;

/// Error type for API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("server rejected the request ({status}): {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message, or the raw response body.
        message: String,
    },

    /// The request could not complete (connect, timeout, decode).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// The message a store should surface for this failure.
    pub fn surface_message(&self) -> String {
        match self {
            Self::Remote { message, .. } if !message.is_empty() => message.clone(),
            Self::Remote { status, .. } => format!("request failed with status {}", status),
            Self::Network(_) => "could not reach the server".to_string(),
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
