//! Reader-mode extraction of the main textual content of a page

use std::collections::HashSet;

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, trace, warn};

use crate::extractor::error::ExtractError;
use crate::text::char_len;

/// Elements stripped before any content selection happens
pub const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "iframe",
    "nav",
    "footer",
    "header",
    "aside",
    "form",
    ".advertisement",
    ".ads",
    ".ad",
    ".social-share",
    ".comments",
    ".sidebar",
    ".navigation",
    ".menu",
    ".cookie",
    ".gdpr",
    ".newsletter",
    ".popup",
    ".modal",
    "[class*='ad-']",
    "[class*='ads-']",
    "[id*='ad-']",
    "[id*='ads-']",
    "[class*='social']",
    "[class*='share']",
    "[class*='follow']",
    "[id*='social']",
    "[id*='share']",
    "[id*='follow']",
];

/// Candidate main-content containers, most specific first
pub const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".entry-content",
    ".article-content",
    "#content",
    "#main-content",
    ".article-body",
    ".content",
    ".description",
];

/// Elements whose text becomes a block of the structured text
pub const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, p, li, pre, blockquote, .description, .summary";

/// Blocks must be longer than this many characters to be kept
pub const MIN_BLOCK_CHARS: usize = 15;

/// Below this many blocks the paragraph widening pass runs
pub const MIN_BLOCKS_BEFORE_WIDENING: usize = 3;

/// Separator placed between blocks
pub const BLOCK_SEPARATOR: &str = "\n\n";

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Where the extracted blocks came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentContainer {
    /// A main-content selector matched
    Selector(&'static str),
    /// Nothing matched and the whole body was used
    Body,
}

/// Result of reader-mode extraction
#[derive(Debug, Clone)]
pub struct StructuredContent {
    /// Retained text blocks in document order
    pub blocks: Vec<String>,

    /// Container the blocks were collected from
    pub container: ContentContainer,

    /// Whether the paragraph widening pass ran
    pub widened: bool,
}

impl StructuredContent {
    /// Blocks joined with blank lines
    pub fn text(&self) -> String {
        self.blocks.join(BLOCK_SEPARATOR)
    }
}

/// Noise elements of a document, by node id
struct NoiseMap {
    ids: HashSet<NodeId>,
}

impl NoiseMap {
    fn build(document: &Html) -> Self {
        let mut ids = HashSet::new();
        for selector_str in NOISE_SELECTORS {
            match parse_selector(selector_str) {
                Ok(selector) => ids.extend(document.select(&selector).map(|el| el.id())),
                Err(e) => warn!("Skipping noise selector: {}", e),
            }
        }
        trace!("Marked {} noise elements", ids.len());
        Self { ids }
    }

    /// True when the element or one of its ancestors is noise
    fn covers(&self, element: &ElementRef) -> bool {
        std::iter::once(**element)
            .chain(element.ancestors())
            .any(|node| self.ids.contains(&node.id()))
    }

    /// Text of `element` with noise subtrees left out
    fn visible_text(&self, element: &ElementRef) -> String {
        let mut out = String::new();
        self.collect_text(**element, &mut out);
        out
    }

    fn collect_text(&self, node: NodeRef<'_, Node>, out: &mut String) {
        for child in node.children() {
            match child.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(_) if !self.ids.contains(&child.id()) => {
                    self.collect_text(child, out)
                }
                _ => {}
            }
        }
    }
}

fn body_of(document: &Html) -> ElementRef<'_> {
    parse_selector("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element())
}

fn find_container<'a>(document: &'a Html, noise: &NoiseMap) -> (ElementRef<'a>, ContentContainer) {
    for selector_str in MAIN_CONTENT_SELECTORS {
        let selector = match parse_selector(selector_str) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Skipping content selector: {}", e);
                continue;
            }
        };
        if let Some(element) = document.select(&selector).find(|el| !noise.covers(el)) {
            debug!("Main content container found: \"{}\"", selector_str);
            return (element, ContentContainer::Selector(selector_str));
        }
    }

    debug!("No main content container matched, using body");
    (body_of(document), ContentContainer::Body)
}

fn keep_block(text: &str) -> bool {
    char_len(text) > MIN_BLOCK_CHARS
}

/// Extract the reader-mode blocks of a parsed document
///
/// Noise elements are ignored everywhere, the first matching main-content
/// container is scanned for headings, paragraphs, list items, preformatted
/// text and quotes, and when that yields fewer than three blocks every
/// remaining paragraph of the body is considered as well.
pub fn extract_content(document: &Html) -> StructuredContent {
    let noise = NoiseMap::build(document);
    let (container_element, container) = find_container(document, &noise);

    let mut blocks = Vec::new();
    match parse_selector(BLOCK_SELECTOR) {
        Ok(selector) => {
            for element in container_element.select(&selector) {
                if noise.covers(&element) {
                    continue;
                }
                let text = noise.visible_text(&element);
                let text = text.trim();
                if keep_block(text) {
                    blocks.push(text.to_string());
                }
            }
        }
        Err(e) => warn!("Skipping block selector: {}", e),
    }

    let mut widened = false;
    if blocks.len() < MIN_BLOCKS_BEFORE_WIDENING {
        widened = true;
        debug!("Only {} blocks found, widening to all paragraphs", blocks.len());
        if let Ok(selector) = parse_selector("p") {
            for element in body_of(document).select(&selector) {
                if noise.covers(&element) {
                    continue;
                }
                let text = noise.visible_text(&element);
                let text = text.trim();
                if keep_block(text) && !blocks.iter().any(|b| b == text) {
                    blocks.push(text.to_string());
                }
            }
        }
    }

    debug!(
        "Extracted {} text blocks, {} characters",
        blocks.len(),
        blocks.iter().map(|b| char_len(b)).sum::<usize>()
    );

    StructuredContent {
        blocks,
        container,
        widened,
    }
}

/// Extract the condensed, blank-line separated text of a parsed document
pub fn extract_structured_text(document: &Html) -> String {
    extract_content(document).text()
}
