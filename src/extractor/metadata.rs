//! Title and description extraction

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::extractor::error::ExtractError;
use crate::extractor::structured::parse_selector;
use crate::text::{char_len, truncate_chars};

/// Title sources, tried in order
pub const TITLE_SELECTORS: &[&str] = &[
    "meta[property='og:title']",
    "meta[name='twitter:title']",
    "meta[name='title']",
    "title",
    "h1",
    ".title",
    ".post-title",
    ".article-title",
];

/// Description sources, tried in order
pub const DESCRIPTION_SELECTORS: &[&str] = &[
    "meta[name='description']",
    "meta[property='og:description']",
    "meta[name='twitter:description']",
    ".description",
    ".excerpt",
    ".summary",
];

/// A title candidate must be longer than this
pub const MIN_TITLE_CHARS: usize = 3;

/// A description candidate must be longer than this
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Titles are cut to this many characters
pub const MAX_TITLE_CHARS: usize = 120;

/// Title and description of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Best-effort title, never empty
    pub title: String,

    /// Description published by the page itself, possibly empty
    pub description: String,
}

/// Host of `url` with a leading `www.` removed
pub fn display_host(url: &Url) -> Result<String, ExtractError> {
    let host = url
        .host_str()
        .ok_or_else(|| ExtractError::MissingHost(url.to_string()))?;
    Ok(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// First candidate from `selectors` whose trimmed text is longer than `min_chars`
///
/// `meta` selectors read the `content` attribute, everything else reads the
/// element text.
fn first_candidate(document: &Html, selectors: &[&str], min_chars: usize) -> Option<String> {
    for selector_str in selectors {
        let selector = match parse_selector(selector_str) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Skipping metadata selector: {}", e);
                continue;
            }
        };

        let Some(element) = document.select(&selector).next() else {
            continue;
        };

        let candidate = if selector_str.starts_with("meta") {
            element.value().attr("content").unwrap_or_default().trim().to_string()
        } else {
            element.text().collect::<String>().trim().to_string()
        };

        if char_len(&candidate) > min_chars {
            debug!("Metadata from \"{}\": {}", selector_str, truncate_chars(&candidate, 80));
            return Some(candidate);
        }
    }
    None
}

/// Extract title and description from a page
///
/// The title falls back to the page host when no source qualifies and is
/// always cut to [`MAX_TITLE_CHARS`]. The description is empty when no source
/// qualifies.
pub fn extract_metadata(document: &Html, url: &Url) -> Result<PageMetadata, ExtractError> {
    let title = match first_candidate(document, TITLE_SELECTORS, MIN_TITLE_CHARS) {
        Some(title) => title,
        None => {
            let host = display_host(url)?;
            debug!("No title source qualified, using host {}", host);
            host
        }
    };
    let title = truncate_chars(&title, MAX_TITLE_CHARS).trim().to_string();

    let description =
        first_candidate(document, DESCRIPTION_SELECTORS, MIN_DESCRIPTION_CHARS).unwrap_or_default();

    Ok(PageMetadata { title, description })
}
