// src/domain/errors.rs
use thiserror::Error;

/// Client-side error taxonomy for the state service.
///
/// Transport failures, non-2xx responses, cancellation, and undecodable
/// bodies are all distinct conditions. A 2xx body that is valid JSON but
/// does not match the expected field set is NOT an error: absent and extra
/// fields pass through silently.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(#[from] hyper::Error),

    #[error("API error: {status} {status_text}")]
    Api {
        status: u16,
        status_text: String,
        /// Raw response body, passed through unmodified.
        body: String,
    },

    #[error("Malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Request error: {0}")]
    Http(#[from] hyper::http::Error),

    #[error("Request canceled")]
    Canceled,
}

impl ClientError {
    /// HTTP status code, when the error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, ClientError::Canceled)
    }
}

// Result type alias for convenience
pub type ClientResult<T> = Result<T, ClientError>;
