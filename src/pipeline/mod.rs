//! # Analysis Pipeline Module
//!
//! Drives one analysis from a URL to an [`AnalysisResult`]: fetch, extract,
//! condense, run inference when a backend is available, select tags, always
//! run the rule-based tagger, merge, and pick a description.
//!
//! ## Key Components
//!
//! - `Analyzer`: the pipeline, generic over its fetcher and inference backend
//! - `AnalyzerConfig`: configuration handed in by the caller
//! - `AnalysisResult`: the output document
//! - `AnalyzeError`: the two failures that abort an analysis
//!
//! Every request is independent; an `Analyzer` holds no per-request state and
//! can be shared between tasks.

mod config;
mod error;
mod result;

pub use config::{AnalyzerConfig, AnalyzerConfigBuilder};
pub use error::{AnalyzeError, ErrorBody};
pub use result::{
    AiGenerated, AnalysisMethod, AnalysisResult, AnalyzeRequest, DebugInfo, DescriptionSource,
};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::extractor::{build_document, display_host};
use crate::fetcher::{HttpPageFetcher, PageFetcher};
use crate::inference::{HuggingFaceClient, InferenceBackend, InferenceConfig, run_inference};
use crate::tagging::{backup_tags, merge_tags, select_smart_tags};
use crate::text::char_len;

/// A model description must be longer than this to replace the page's own
pub const MIN_AI_DESCRIPTION_CHARS: usize = 15;

/// Descriptions shorter than this are replaced by `Resource from {host}`
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// The URL analysis pipeline
#[derive(Debug, Clone)]
pub struct Analyzer<F, I> {
    fetcher: F,
    inference: Option<I>,
    config: InferenceConfig,
}

impl Analyzer<HttpPageFetcher, HuggingFaceClient> {
    /// Build the production pipeline
    ///
    /// Without a credential the analyzer runs on the rule-based tagger alone.
    pub fn from_config(config: AnalyzerConfig) -> crate::Result<Self> {
        let fetcher = HttpPageFetcher::new(config.fetcher)?;
        let inference = if config.inference.has_credential() {
            Some(HuggingFaceClient::from_config(&config.inference)?)
        } else {
            info!("No inference credential configured; tags will come from rules only");
            None
        };
        Ok(Self::new(fetcher, inference, config.inference))
    }
}

impl<F: PageFetcher, I: InferenceBackend> Analyzer<F, I> {
    /// Assemble a pipeline from its parts
    pub fn new(fetcher: F, inference: Option<I>, config: InferenceConfig) -> Self {
        Self {
            fetcher,
            inference,
            config,
        }
    }

    /// Analyze the page named by a request document
    pub async fn analyze_request(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<AnalysisResult, AnalyzeError> {
        self.analyze(&request.url).await
    }

    /// Analyze the page at `url`
    #[instrument(skip(self))]
    pub async fn analyze(&self, url: &str) -> Result<AnalysisResult, AnalyzeError> {
        let url = parse_url(url)?;
        let domain = url.host_str().unwrap_or_default().to_string();
        let display = display_host(&url).map_err(|e| AnalyzeError::InvalidUrl(e.to_string()))?;

        let page = self.fetcher.fetch(&url).await?;
        let document =
            build_document(&page).map_err(|e| AnalyzeError::InvalidUrl(e.to_string()))?;
        let condensed = document.condensed_text();
        debug!(
            "Condensed text: {} chars, {} blocks",
            char_len(&condensed),
            document.block_count()
        );

        let backup = backup_tags(&condensed, &document.title, &domain);

        let mut description_error = None;
        let mut classification_error = None;
        let (summary, ai_tags, method) = match &self.inference {
            None => (None, Vec::new(), AnalysisMethod::None),
            Some(backend) => {
                let outcome = run_inference(backend, &self.config, &condensed).await;

                let summary = match outcome.description {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        description_error = Some(e.to_string());
                        None
                    }
                };

                match outcome.classification {
                    Ok(classification) => {
                        let tags = select_smart_tags(&classification.labels, &classification.scores);
                        (summary, tags, AnalysisMethod::Mnli)
                    }
                    Err(e) => {
                        warn!("Classification failed, using rule-based tags: {}", e);
                        classification_error = Some(e.to_string());
                        (summary, backup.clone(), AnalysisMethod::Direct)
                    }
                }
            }
        };

        let final_tags = merge_tags(&ai_tags, &backup);
        let tags: Vec<String> = final_tags.iter().map(|t| t.tag.clone()).collect();

        let ai_description = summary
            .as_ref()
            .map(|s| s.text.trim())
            .filter(|text| char_len(text) > MIN_AI_DESCRIPTION_CHARS);
        let (mut description, mut description_source) = match ai_description {
            Some(text) => (text.to_string(), DescriptionSource::Ai),
            None => (document.web_description.clone(), DescriptionSource::Page),
        };
        if char_len(description.trim()) < MIN_DESCRIPTION_CHARS {
            description = format!("Resource from {}", display);
            description_source = DescriptionSource::Synthesized;
        }

        let success = method == AnalysisMethod::Mnli;
        info!(
            "Analysis finished - method {}, tags [{}]",
            method.as_str(),
            tags.join(", ")
        );

        Ok(AnalysisResult {
            title: document.title.clone(),
            description,
            tag_line: tags.join(", "),
            ai_generated: AiGenerated {
                description: description_source == DescriptionSource::Ai,
                tags: ai_tags.clone(),
                backup_tags: backup.clone(),
                success,
                method,
                tags_with_confidence: final_tags.clone(),
            },
            debug: DebugInfo {
                domain,
                ai_used: success,
                ai_method: method,
                ai_tags_count: ai_tags.len(),
                backup_tags_count: backup.len(),
                total_tags: final_tags.len(),
                content_length: char_len(&condensed),
                structured_blocks: document.block_count(),
                http_status: page.http_status,
                final_url: page.final_url.to_string(),
                description_source,
                description_error,
                classification_error,
                analyzed_at: Utc::now(),
            },
            tags,
        })
    }
}

/// Parse and validate the input URL
fn parse_url(input: &str) -> Result<Url, AnalyzeError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AnalyzeError::InvalidUrl("URL is required".to_string()));
    }

    let url =
        Url::parse(input).map_err(|e| AnalyzeError::InvalidUrl(format!("{}: {}", input, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AnalyzeError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AnalyzeError::InvalidUrl(format!("{} has no host", input)));
    }
    Ok(url)
}

/// Analyze `url` with a freshly built production pipeline
pub async fn analyze_url(url: &str, config: AnalyzerConfig) -> crate::Result<AnalysisResult> {
    let analyzer = Analyzer::from_config(config)?;
    Ok(analyzer.analyze(url).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchError, StaticFetcher};
    use crate::inference::{ClassificationResponse, GeneratedText, MockInference, MockReply};
    use crate::tagging::TagSource;
    use std::collections::HashSet;

    const PRIMARY: &str = "facebook/bart-large-cnn";
    const FALLBACK: &str = "google/flan-t5-small";

    const ASYNC_PAGE: &str = r#"<html><head>
        <title>Async Rust Patterns | Blog</title>
        <meta property="og:title" content="Async Rust Patterns">
        <meta name="description" content="Patterns for writing async Rust services.">
        </head><body>
        <nav><a href="/">Home</a><a href="/archive">Archive of every post</a></nav>
        <article>
          <p>Futures are lazy until they are polled by an executor.</p>
          <p>Pinning keeps self-referential futures in one place.</p>
          <p>Select lets one task race several futures at once.</p>
        </article>
        </body></html>"#;

    fn config() -> InferenceConfig {
        InferenceConfig::builder()
            .api_token(Some("token".to_string()))
            .timeouts_ms(50, 50, 50)
            .build()
    }

    fn analyzer(
        fetcher: StaticFetcher,
        inference: Option<MockInference>,
    ) -> Analyzer<StaticFetcher, MockInference> {
        Analyzer::new(fetcher, inference, config())
    }

    fn assert_tag_invariants(result: &AnalysisResult) {
        assert!(result.tags.len() <= 5);
        let unique: HashSet<&String> = result.tags.iter().collect();
        assert_eq!(unique.len(), result.tags.len());
        for tag in &result.ai_generated.tags_with_confidence {
            if tag.source == TagSource::Backup {
                assert_eq!(tag.confidence, 0);
            }
        }
        assert_eq!(result.tag_line, result.tags.join(", "));
    }

    #[tokio::test]
    async fn test_og_title_and_structured_text() {
        let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), None);

        let result = analyzer
            .analyze("https://blog.example.com/async")
            .await
            .unwrap();

        assert_eq!(result.title, "Async Rust Patterns");
        assert_eq!(result.description, "Patterns for writing async Rust services.");
        assert_eq!(result.debug.description_source, DescriptionSource::Page);
        assert_eq!(result.debug.structured_blocks, 3);
        assert_eq!(result.debug.http_status, 200);
        assert!(!result.ai_generated.success);
        assert_eq!(result.ai_generated.method, AnalysisMethod::None);
        assert!(result.ai_generated.tags.is_empty());
        assert_tag_invariants(&result);
    }

    #[tokio::test]
    async fn test_high_confidence_classification() {
        let mock = MockInference::new()
            .with_summary(
                PRIMARY,
                MockReply::Ok(vec![GeneratedText::summary(
                    "A tour of patterns for async Rust.",
                )]),
            )
            .with_classification(MockReply::Ok(ClassificationResponse::new(
                &["gaming", "software", "news"],
                &[0.31, 0.25, 0.22],
            )));
        let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), Some(mock));

        let result = analyzer
            .analyze("https://blog.example.com/async")
            .await
            .unwrap();

        let ai: Vec<(&str, u8, TagSource)> = result
            .ai_generated
            .tags
            .iter()
            .map(|t| (t.tag.as_str(), t.confidence, t.source))
            .collect();
        assert_eq!(
            ai,
            vec![
                ("games", 31, TagSource::AiHigh),
                ("software", 25, TagSource::AiHigh),
                ("noticias", 22, TagSource::AiHigh),
            ]
        );
        assert_eq!(&result.tags[..3], &["games", "software", "noticias"]);
        assert!(result.ai_generated.success);
        assert_eq!(result.ai_generated.method, AnalysisMethod::Mnli);
        assert!(result.ai_generated.description);
        assert_eq!(result.description, "A tour of patterns for async Rust.");
        assert_tag_invariants(&result);
    }

    #[tokio::test]
    async fn test_rule_tags_fill_remaining_slots_after_classification() {
        let mock = MockInference::new().with_classification(MockReply::Ok(
            ClassificationResponse::new(&["gaming", "software", "news"], &[0.31, 0.25, 0.22]),
        ));
        let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), Some(mock));

        let result = analyzer
            .analyze("https://github.com/tokio-rs/tokio")
            .await
            .unwrap();

        assert_eq!(result.ai_generated.method, AnalysisMethod::Mnli);
        let backup: Vec<&str> = result
            .ai_generated
            .backup_tags
            .iter()
            .map(|t| t.tag.as_str())
            .collect();
        assert_eq!(backup, vec!["codigo", "open-source", "programacao"]);
        assert_eq!(result.debug.backup_tags_count, 3);
        assert_eq!(
            result.tags,
            vec!["games", "software", "noticias", "codigo", "open-source"]
        );
        assert_eq!(
            result.ai_generated.tags_with_confidence[3].source,
            TagSource::Backup
        );
        assert_tag_invariants(&result);
    }

    #[tokio::test]
    async fn test_classifier_tag_wins_over_duplicate_rule_tag() {
        let mock = MockInference::new().with_classification(MockReply::Ok(
            ClassificationResponse::new(&["programming", "tutorial", "news"], &[0.4, 0.3, 0.25]),
        ));
        let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), Some(mock));

        let result = analyzer
            .analyze("https://github.com/tokio-rs/tokio")
            .await
            .unwrap();

        assert_eq!(
            result.tags,
            vec!["programacao", "tutorial", "noticias", "codigo", "open-source"]
        );
        let first = &result.ai_generated.tags_with_confidence[0];
        assert_eq!(first.tag, "programacao");
        assert_eq!(first.source, TagSource::AiHigh);
        assert_eq!(first.confidence, 40);
        assert!(
            result
                .ai_generated
                .backup_tags
                .iter()
                .any(|t| t.tag == "programacao")
        );
        assert_tag_invariants(&result);
    }

    #[tokio::test]
    async fn test_classifier_timeout_falls_back_to_rules() {
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::Hang)
            .with_summary(FALLBACK, MockReply::Hang)
            .with_classification(MockReply::Hang);
        let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), Some(mock));

        let result = analyzer
            .analyze("https://github.com/tokio-rs/tokio")
            .await
            .unwrap();

        assert!(!result.ai_generated.success);
        assert_eq!(result.ai_generated.method, AnalysisMethod::Direct);
        assert_eq!(result.tags, vec!["codigo", "open-source", "programacao"]);
        assert_eq!(result.ai_generated.tags, result.ai_generated.backup_tags);
        assert!(
            result
                .ai_generated
                .tags_with_confidence
                .iter()
                .all(|t| t.source == TagSource::Backup)
        );
        assert!(result.debug.classification_error.is_some());
        assert!(result.debug.description_error.is_some());
        assert_tag_invariants(&result);
    }

    #[tokio::test]
    async fn test_description_synthesized_from_host() {
        let html = r#"<html><head><title>Notes</title>
            <meta name="description" content="Short"></head>
            <body><p>Nothing much here.</p></body></html>"#;
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::fail(503, "loading"))
            .with_summary(FALLBACK, MockReply::fail(503, "loading"))
            .with_classification(MockReply::fail(503, "loading"));
        let analyzer = analyzer(StaticFetcher::html(html), Some(mock));

        let result = analyzer
            .analyze("https://www.example.org/notes")
            .await
            .unwrap();

        assert_eq!(result.description, "Resource from example.org");
        assert_eq!(
            result.debug.description_source,
            DescriptionSource::Synthesized
        );
        assert!(!result.ai_generated.description);
        assert_eq!(result.debug.domain, "www.example.org");
    }

    #[tokio::test]
    async fn test_short_ai_description_is_ignored() {
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::Ok(vec![GeneratedText::summary("Rust stuff.")]))
            .with_classification(MockReply::Ok(ClassificationResponse::new(&["blog"], &[0.1])));
        let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), Some(mock));

        let result = analyzer
            .analyze("https://blog.example.com/async")
            .await
            .unwrap();

        assert_eq!(result.description, "Patterns for writing async Rust services.");
        assert!(!result.ai_generated.description);
        assert_eq!(result.ai_generated.tags[0].tag, "blog");
        assert_eq!(result.ai_generated.tags[0].source, TagSource::AiBest);
    }

    #[tokio::test]
    async fn test_no_inference_calls_without_credential() {
        let analyzer: Analyzer<StaticFetcher, MockInference> =
            Analyzer::new(StaticFetcher::html(ASYNC_PAGE), None, InferenceConfig::default());

        let result = analyzer
            .analyze("https://github.com/tokio-rs/tokio")
            .await
            .unwrap();

        assert_eq!(result.ai_generated.method, AnalysisMethod::None);
        assert!(!result.debug.ai_used);
        assert_eq!(result.tags, vec!["codigo", "open-source", "programacao"]);
    }

    #[tokio::test]
    async fn test_invalid_urls_are_rejected() {
        let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), None);

        for input in ["", "not a url", "ftp://example.com/file", "mailto:someone@example.com"] {
            let err = analyzer.analyze(input).await.unwrap_err();
            assert!(
                matches!(err, AnalyzeError::InvalidUrl(_)),
                "{} gave {:?}",
                input,
                err
            );
            assert_eq!(err.to_body().error, "Invalid URL");
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal() {
        let mock = MockInference::new();
        let analyzer = analyzer(StaticFetcher::timeout(12_000), Some(mock.clone()));

        let err = analyzer
            .analyze("https://example.com/slow")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalyzeError::Fetch(FetchError::Timeout(12_000))));
        assert!(mock.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_request_document() {
        let analyzer = analyzer(StaticFetcher::status(404), None);
        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"url": "https://example.com/gone"}"#).unwrap();

        let err = analyzer.analyze_request(&request).await.unwrap_err();
        let body = err.to_body();

        assert_eq!(body.error, "Failed to fetch page");
        assert!(body.message.unwrap().contains("404"));
    }

    #[test]
    fn test_repeated_runs_give_identical_tags() {
        let run = || {
            let mock = MockInference::new().with_classification(MockReply::Ok(
                ClassificationResponse::new(
                    &["tutorial", "programming", "guide", "blog"],
                    &[0.17, 0.17, 0.12, 0.12],
                ),
            ));
            let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), Some(mock));
            tokio_test::block_on(analyzer.analyze("https://blog.example.com/async")).unwrap()
        };

        let first = run();
        let second = run();

        assert_eq!(first.tags, second.tags);
        assert_eq!(
            first.ai_generated.tags_with_confidence,
            second.ai_generated.tags_with_confidence
        );
        let sources: Vec<TagSource> = first.ai_generated.tags.iter().map(|t| t.source).collect();
        assert_eq!(
            sources,
            vec![TagSource::AiMedium, TagSource::AiMedium, TagSource::AiLow]
        );
        assert_eq!(&first.tags[..3], &["tutorial", "programacao", "guia"]);
        assert_tag_invariants(&first);
    }

    #[test]
    fn test_result_serializes_in_camel_case() {
        let analyzer = analyzer(StaticFetcher::html(ASYNC_PAGE), None);
        let result =
            tokio_test::block_on(analyzer.analyze("https://blog.example.com/async")).unwrap();

        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("tagLine").is_some());
        assert_eq!(value["aiGenerated"]["method"], "none");
        assert!(value["aiGenerated"]["backupTags"].is_array());
        assert!(value["aiGenerated"]["tagsWithConfidence"].is_array());
        assert!(value["debug"]["structuredBlocks"].is_number());
        assert!(value["debug"].get("descriptionError").is_none());
    }
}
