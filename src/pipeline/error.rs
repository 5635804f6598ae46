//! Error types for the analysis pipeline
//!
//! Only the two fatal categories live here. Inference failures are recovered
//! inside the pipeline and show up in the result's debug block instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::Error as CrateError;
use crate::fetcher::FetchError;

/// Error type for a failed analysis
#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The input URL could not be parsed or is not http(s)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The page could not be retrieved
    #[error("Failed to fetch page: {0}")]
    Fetch(#[from] FetchError),
}

/// Wire form of an [`AnalyzeError`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Short error category
    pub error: String,

    /// Detail, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AnalyzeError {
    /// Structured body for callers that speak JSON
    pub fn to_body(&self) -> ErrorBody {
        match self {
            AnalyzeError::InvalidUrl(detail) => ErrorBody {
                error: "Invalid URL".to_string(),
                message: Some(detail.clone()),
            },
            AnalyzeError::Fetch(e) => ErrorBody {
                error: "Failed to fetch page".to_string(),
                message: Some(e.to_string()),
            },
        }
    }
}

impl From<&AnalyzeError> for ErrorBody {
    fn from(err: &AnalyzeError) -> Self {
        err.to_body()
    }
}

impl From<AnalyzeError> for CrateError {
    fn from(err: AnalyzeError) -> Self {
        match err {
            AnalyzeError::InvalidUrl(msg) => CrateError::InvalidUrl(msg),
            AnalyzeError::Fetch(e) => e.into(),
        }
    }
}
