//! Description and classification calls with their fallback policies
//!
//! The description path tries the primary summarizer, then the smaller
//! fallback model once. The classification path is a single call; its
//! fallback is the rule-based tagger, which lives in the pipeline. Each call
//! is bounded by its own timeout and the two paths never affect each other.

use std::future::Future;
use std::time::Duration;

use futures::future::join;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::inference::InferenceBackend;
use crate::inference::config::InferenceConfig;
use crate::inference::error::InferenceError;
use crate::inference::types::{
    Classification, ClassificationParameters, ClassificationRequest, GeneratedText,
    SummarizationParameters, SummarizationRequest,
};
use crate::text::truncate_chars;

/// Prompt prefix of the primary summarization request
pub const SUMMARY_PROMPT_PREFIX: &str = "Summarize in one sentence: ";

/// Prompt prefix of the fallback summarization request
pub const FALLBACK_PROMPT_PREFIX: &str = "Summarize: ";

/// A one-sentence description and the model that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Generated text, trimmed
    pub text: String,

    /// Model that answered
    pub model: String,
}

/// Outcome of both inference paths for one document
#[derive(Debug)]
pub struct InferenceOutcome {
    /// Description path result
    pub description: Result<Summary, InferenceError>,

    /// Classification path result
    pub classification: Result<Classification, InferenceError>,
}

/// Bound a call by `timeout`; expiry is reported like any other failure
async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, InferenceError>
where
    F: Future<Output = Result<T, InferenceError>>,
{
    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| Err(InferenceError::Timeout(timeout.as_millis() as u64)))
}

/// First non-blank text selected by `field` in a generation response
fn first_text(
    items: Vec<GeneratedText>,
    field: &'static str,
    pick: fn(GeneratedText) -> Option<String>,
) -> Result<String, InferenceError> {
    items
        .into_iter()
        .next()
        .and_then(pick)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or(InferenceError::MissingField(field))
}

async fn summarize_primary<B: InferenceBackend>(
    backend: &B,
    config: &InferenceConfig,
    text: &str,
) -> Result<Summary, InferenceError> {
    let request = SummarizationRequest {
        inputs: format!(
            "{}{}",
            SUMMARY_PROMPT_PREFIX,
            truncate_chars(text, config.summary_input_chars)
        ),
        parameters: SummarizationParameters {
            max_length: 50,
            min_length: Some(10),
            do_sample: Some(false),
            temperature: None,
        },
    };

    let timeout = config.summary_timeout();
    let items = with_timeout(
        timeout,
        backend.summarize(&config.summary_model, &request, timeout),
    )
    .await?;
    let text = first_text(items, "summary_text", |item| item.summary_text)?;

    Ok(Summary {
        text,
        model: config.summary_model.clone(),
    })
}

async fn summarize_fallback<B: InferenceBackend>(
    backend: &B,
    config: &InferenceConfig,
    text: &str,
) -> Result<Summary, InferenceError> {
    let request = SummarizationRequest {
        inputs: format!(
            "{}{}",
            FALLBACK_PROMPT_PREFIX,
            truncate_chars(text, config.fallback_input_chars)
        ),
        parameters: SummarizationParameters {
            max_length: 40,
            min_length: None,
            do_sample: None,
            temperature: Some(0.3),
        },
    };

    let timeout = config.fallback_timeout();
    let items = with_timeout(
        timeout,
        backend.summarize(&config.fallback_summary_model, &request, timeout),
    )
    .await?;
    let text = first_text(items, "generated_text", |item| item.generated_text)?;

    Ok(Summary {
        text,
        model: config.fallback_summary_model.clone(),
    })
}

/// Produce a one-sentence description of `text`
///
/// Tries the primary summarizer and, on any failure, the fallback model
/// exactly once.
#[instrument(skip_all, fields(model = %config.summary_model))]
pub async fn describe<B: InferenceBackend>(
    backend: &B,
    config: &InferenceConfig,
    text: &str,
) -> Result<Summary, InferenceError> {
    let primary = match summarize_primary(backend, config, text).await {
        Ok(summary) => {
            debug!("Primary summarizer answered");
            return Ok(summary);
        }
        Err(e) => e,
    };
    warn!(
        "Summarizer {} failed: {}; trying {}",
        config.summary_model, primary, config.fallback_summary_model
    );

    match summarize_fallback(backend, config, text).await {
        Ok(summary) => {
            info!("Fallback summarizer {} answered", summary.model);
            Ok(summary)
        }
        Err(fallback) => {
            warn!(
                "Fallback summarizer {} failed: {}",
                config.fallback_summary_model, fallback
            );
            Err(InferenceError::FallbackExhausted {
                primary: primary.to_string(),
                fallback: fallback.to_string(),
            })
        }
    }
}

/// Score `text` against the configured candidate labels
#[instrument(skip_all, fields(model = %config.classifier_model))]
pub async fn classify_text<B: InferenceBackend>(
    backend: &B,
    config: &InferenceConfig,
    text: &str,
) -> Result<Classification, InferenceError> {
    let request = ClassificationRequest {
        inputs: truncate_chars(text, config.classification_input_chars).to_string(),
        parameters: ClassificationParameters {
            candidate_labels: config.candidate_labels.clone(),
        },
    };

    let timeout = config.classification_timeout();
    let result = with_timeout(
        timeout,
        backend.classify(&config.classifier_model, &request, timeout),
    )
    .await
    .and_then(|response| {
        let labels = response.labels.ok_or(InferenceError::MissingField("labels"))?;
        let scores = response.scores.ok_or(InferenceError::MissingField("scores"))?;
        if labels.len() != scores.len() {
            return Err(InferenceError::UnexpectedResponse(format!(
                "{} labels but {} scores",
                labels.len(),
                scores.len()
            )));
        }
        Ok(Classification { labels, scores })
    });

    match &result {
        Ok(classification) => debug!("Classifier returned {} labels", classification.labels.len()),
        Err(e) => warn!("Classifier {} failed: {}", config.classifier_model, e),
    }
    result
}

/// Run both inference paths concurrently
///
/// Neither path is cancelled by the failure of the other.
pub async fn run_inference<B: InferenceBackend>(
    backend: &B,
    config: &InferenceConfig,
    text: &str,
) -> InferenceOutcome {
    let (description, classification) = join(
        describe(backend, config, text),
        classify_text(backend, config, text),
    )
    .await;

    InferenceOutcome {
        description,
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::mock::{MockCall, MockInference, MockReply};
    use crate::inference::types::ClassificationResponse;

    const PRIMARY: &str = "facebook/bart-large-cnn";
    const FALLBACK: &str = "google/flan-t5-small";

    fn config() -> InferenceConfig {
        InferenceConfig::builder()
            .api_token(Some("token".to_string()))
            .timeouts_ms(50, 50, 50)
            .build()
    }

    #[tokio::test]
    async fn test_primary_summary_is_used() {
        let mock = MockInference::new().with_summary(
            PRIMARY,
            MockReply::Ok(vec![GeneratedText::summary("  A tutorial on React hooks.  ")]),
        );

        let summary = describe(&mock, &config(), "Title: Hooks").await.unwrap();

        assert_eq!(summary.text, "A tutorial on React hooks.");
        assert_eq!(summary.model, PRIMARY);
        assert_eq!(mock.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_after_primary_failure() {
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::fail(503, "loading"))
            .with_summary(
                FALLBACK,
                MockReply::Ok(vec![GeneratedText::generated("Short summary of hooks.")]),
            );

        let summary = describe(&mock, &config(), "Title: Hooks").await.unwrap();
        assert_eq!(summary.model, FALLBACK);

        let calls = mock.calls().await;
        assert_eq!(calls.len(), 2);
        match &calls[1] {
            MockCall::Summarize { model, request } => {
                assert_eq!(model, FALLBACK);
                assert!(request.inputs.starts_with(FALLBACK_PROMPT_PREFIX));
                assert_eq!(request.parameters.max_length, 40);
            }
            other => panic!("unexpected call {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_summary_field_triggers_fallback() {
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::Ok(vec![GeneratedText::generated("wrong field")]))
            .with_summary(FALLBACK, MockReply::Ok(vec![GeneratedText::generated("ok")]));

        let summary = describe(&mock, &config(), "text").await.unwrap();
        assert_eq!(summary.text, "ok");
    }

    #[tokio::test]
    async fn test_both_summarizers_failing() {
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::Hang)
            .with_summary(FALLBACK, MockReply::Ok(vec![GeneratedText::generated("   ")]));

        let result = describe(&mock, &config(), "text").await;

        match result {
            Err(InferenceError::FallbackExhausted { primary, fallback }) => {
                assert!(primary.contains("Timed out"));
                assert!(fallback.contains("generated_text"));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_inputs_are_truncated() {
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::Ok(vec![GeneratedText::summary("fine summary")]))
            .with_classification(MockReply::Ok(ClassificationResponse::new(&["news"], &[0.9])));
        let text = "é".repeat(3000);

        let _ = run_inference(&mock, &config(), &text).await;

        for call in mock.calls().await {
            match call {
                MockCall::Summarize { request, .. } => assert_eq!(
                    request.inputs.chars().count(),
                    SUMMARY_PROMPT_PREFIX.chars().count() + 1000
                ),
                MockCall::Classify { request, .. } => {
                    assert_eq!(request.inputs.chars().count(), 1200)
                }
            }
        }
    }

    #[tokio::test]
    async fn test_classification_validation() {
        let mismatched = MockInference::new().with_classification(MockReply::Ok(
            ClassificationResponse::new(&["news", "gaming"], &[0.5]),
        ));
        assert!(matches!(
            classify_text(&mismatched, &config(), "text").await,
            Err(InferenceError::UnexpectedResponse(_))
        ));

        let missing = MockInference::new().with_classification(MockReply::Ok(
            ClassificationResponse {
                sequence: None,
                labels: Some(vec!["news".to_string()]),
                scores: None,
            },
        ));
        assert!(matches!(
            classify_text(&missing, &config(), "text").await,
            Err(InferenceError::MissingField("scores"))
        ));
    }

    #[tokio::test]
    async fn test_paths_are_independent() {
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::fail(500, "boom"))
            .with_summary(FALLBACK, MockReply::fail(500, "boom"))
            .with_classification(MockReply::Ok(ClassificationResponse::new(
                &["gaming", "software"],
                &[0.4, 0.3],
            )));

        let outcome = run_inference(&mock, &config(), "text").await;

        assert!(outcome.description.is_err());
        assert_eq!(outcome.classification.unwrap().labels, vec!["gaming", "software"]);
    }

    #[tokio::test]
    async fn test_classifier_timeout_does_not_block_description() {
        let mock = MockInference::new()
            .with_summary(PRIMARY, MockReply::Ok(vec![GeneratedText::summary("Fine summary.")]))
            .with_classification(MockReply::Hang);

        let outcome = run_inference(&mock, &config(), "text").await;

        assert_eq!(outcome.description.unwrap().text, "Fine summary.");
        assert!(matches!(
            outcome.classification,
            Err(InferenceError::Timeout(50))
        ));
    }
}
