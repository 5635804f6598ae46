//! # linklens - URL content analysis for bookmarks
//!
//! Given a web page URL, this crate fetches the page, extracts a reader-mode
//! rendering of its main content, and produces a title, a one-sentence
//! description and a ranked, deduplicated set of topical tags.
//!
//! ## Features
//!
//! - Browser-like page fetching with bounded timeout and redirects
//! - Reader-mode extraction that skips navigation, ads and social widgets
//! - Metadata resolution from OpenGraph, Twitter and standard meta tags
//! - Summarization with a smaller-model fallback
//! - Zero-shot classification with three-tier confidence selection
//! - Deterministic domain/keyword tagger that works without any service
//! - Async API with Tokio
//! - Robust error handling and logging
//!
//! ## Example
//!
//! ```rust,no_run
//! use linklens::pipeline::{Analyzer, AnalyzerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads HUGGINGFACE_API_KEY; without it only the rule-based tagger runs
//!     let analyzer = Analyzer::from_config(AnalyzerConfig::from_env())?;
//!
//!     let result = analyzer.analyze("https://github.com/tokio-rs/tokio").await?;
//!
//!     println!("{}: {}", result.title, result.tag_line);
//!     Ok(())
//! }
//! ```

mod error;
mod text;

pub mod extractor;
pub mod fetcher;
pub mod inference;
pub mod pipeline;
pub mod tagging;

pub use error::{Error, Result};
pub use pipeline::{AnalysisResult, Analyzer, AnalyzerConfig, analyze_url};

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::pipeline::{AnalysisResult, AnalyzeError, AnalyzeRequest, Analyzer};
}
