//! Error types for the extractor module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for extraction operations
///
/// Extraction itself never fails on page content; these errors surface only
/// when one of the built-in selectors cannot be compiled, and callers skip
/// that selector after logging it.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// CSS selector parsing error
    #[error("Selector parse error for '{selector}': {message}")]
    Selector {
        /// The selector source text
        selector: String,
        /// Parser message
        message: String,
    },

    /// URL has no host to fall back on
    #[error("URL has no host: {0}")]
    MissingHost(String),
}

impl From<ExtractError> for CrateError {
    fn from(err: ExtractError) -> Self {
        CrateError::Extraction(err.to_string())
    }
}
