//! Error types for the inference module
//!
//! None of these cross the pipeline boundary; every one of them is recovered
//! by a fallback and only recorded for diagnostics.

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for inference operations
#[derive(Debug, Error)]
pub enum InferenceError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The call did not complete within its timeout
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// API returned an error response
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Please retry after {retry_after_secs} seconds")]
    RateLimit {
        /// Seconds to wait before retrying
        retry_after_secs: u64,
    },

    /// A field the caller relies on was absent or empty
    #[error("Response is missing '{0}'")]
    MissingField(&'static str),

    /// Unexpected response format
    #[error("Unexpected response format: {0}")]
    UnexpectedResponse(String),

    /// Both the primary call and its fallback failed
    #[error("Primary failed ({primary}); fallback failed ({fallback})")]
    FallbackExhausted {
        /// Primary call failure
        primary: String,
        /// Fallback call failure
        fallback: String,
    },

    /// No credential configured
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl From<InferenceError> for CrateError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Http(e) => CrateError::Http(e),
            InferenceError::NotConfigured(msg) => CrateError::NotConfigured(msg),
            _ => CrateError::Inference(err.to_string()),
        }
    }
}
