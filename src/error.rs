//! Error types for the linklens crate

use thiserror::Error;

/// Result type for linklens operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for linklens operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The input URL could not be used
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The target page could not be retrieved
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// HTML could not be turned into a document
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A summarization or classification call failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Required configuration is missing
    #[error("Not configured: {0}")]
    NotConfigured(String),
}
