//! # Content Extraction Module
//!
//! Turns fetched HTML into the condensed document the inference and tagging
//! stages work on: a title, the page's own description, and a reader-mode
//! rendering of the main content as blank-line separated text blocks.
//!
//! Metadata is read from the untouched document; reader-mode extraction
//! ignores navigation, advertising and social widgets before it looks for the
//! main content container.

mod error;
mod metadata;
mod structured;

pub use error::ExtractError;
pub use metadata::{
    DESCRIPTION_SELECTORS, MAX_TITLE_CHARS, MIN_DESCRIPTION_CHARS, MIN_TITLE_CHARS, PageMetadata,
    TITLE_SELECTORS, display_host, extract_metadata,
};
pub use structured::{
    BLOCK_SEPARATOR, ContentContainer, MAIN_CONTENT_SELECTORS, MIN_BLOCK_CHARS, NOISE_SELECTORS,
    StructuredContent, extract_content, extract_structured_text,
};

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::fetcher::RawPage;
use crate::text::truncate_chars;

/// Upper bound on the text handed to the inference stage
pub const MAX_CONDENSED_CHARS: usize = 2500;

/// The structured view of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    /// Best-effort title
    pub title: String,

    /// Description published by the page, possibly empty
    pub web_description: String,

    /// Reader-mode text, possibly empty
    pub structured_text: String,
}

impl ExtractedDocument {
    /// Number of blank-line separated blocks in the structured text
    pub fn block_count(&self) -> usize {
        if self.structured_text.is_empty() {
            return 0;
        }
        self.structured_text.split(BLOCK_SEPARATOR).count()
    }

    /// The text sent to inference, capped at [`MAX_CONDENSED_CHARS`]
    pub fn condensed_text(&self) -> String {
        let full = format!(
            "Title: {}. Description: {}. Content: {}",
            self.title, self.web_description, self.structured_text
        );
        truncate_chars(&full, MAX_CONDENSED_CHARS).to_string()
    }
}

/// Build the structured document for a fetched page
#[instrument(skip(page), fields(url = %page.url))]
pub fn build_document(page: &RawPage) -> Result<ExtractedDocument, ExtractError> {
    let document = Html::parse_document(&page.html);

    let metadata = extract_metadata(&document, &page.url)?;
    let content = extract_content(&document);

    debug!(
        "Container {:?}, {} blocks, widened: {}",
        content.container,
        content.blocks.len(),
        content.widened
    );

    Ok(ExtractedDocument {
        title: metadata.title,
        web_description: metadata.description,
        structured_text: content.text(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn page(html: &str) -> RawPage {
        let url = Url::parse("https://blog.example.com/async").unwrap();
        RawPage {
            url: url.clone(),
            final_url: url,
            html: html.to_string(),
            http_status: 200,
        }
    }

    #[test]
    fn test_build_document_scenario() {
        let html = r#"
            <html><head>
              <meta property="og:title" content="Async Rust Patterns">
              <meta name="description" content="Patterns for writing async Rust code">
            </head><body>
              <nav><p>Home | Blog | About | Contact us today</p></nav>
              <article>
                <p>Futures are lazy and need an executor to run.</p>
                <p>Tokio provides a multi-threaded work-stealing runtime.</p>
                <p>Cancellation happens when a future is dropped.</p>
              </article>
            </body></html>
        "#;

        let doc = build_document(&page(html)).unwrap();

        assert_eq!(doc.title, "Async Rust Patterns");
        assert_eq!(doc.web_description, "Patterns for writing async Rust code");
        assert_eq!(
            doc.structured_text,
            "Futures are lazy and need an executor to run.\n\n\
             Tokio provides a multi-threaded work-stealing runtime.\n\n\
             Cancellation happens when a future is dropped."
        );
        assert_eq!(doc.block_count(), 3);
    }

    #[test]
    fn test_condensed_text_template_and_cap() {
        let doc = ExtractedDocument {
            title: "T".to_string(),
            web_description: "D".to_string(),
            structured_text: "C".to_string(),
        };
        assert_eq!(doc.condensed_text(), "Title: T. Description: D. Content: C");

        let doc = ExtractedDocument {
            title: "T".to_string(),
            web_description: String::new(),
            structured_text: "é".repeat(5000),
        };
        assert_eq!(doc.condensed_text().chars().count(), MAX_CONDENSED_CHARS);
    }

    #[test]
    fn test_empty_page_is_degraded_not_an_error() {
        let doc = build_document(&page("")).unwrap();

        assert_eq!(doc.title, "blog.example.com");
        assert_eq!(doc.web_description, "");
        assert_eq!(doc.structured_text, "");
    }
}
