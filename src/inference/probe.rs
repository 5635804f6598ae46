//! Availability check of the configured models
//!
//! Sends one small request to every model with its configured timeout and
//! reports which ones answer, how fast, and which summarizer to prefer.

use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::inference::InferenceBackend;
use crate::inference::config::InferenceConfig;
use crate::inference::error::InferenceError;
use crate::inference::types::{
    ClassificationParameters, ClassificationRequest, SummarizationParameters,
    SummarizationRequest,
};
use crate::text::truncate_chars;

/// Prompt sent to every probed model
pub const PROBE_PROMPT: &str = "Generate 5 tags for a JavaScript tutorial website about React hooks";

const PREVIEW_CHARS: usize = 80;

/// What a probed model is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelRole {
    /// Primary summarizer
    Summary,
    /// Fallback summarizer
    FallbackSummary,
    /// Zero-shot classifier
    Classifier,
}

impl ModelRole {
    fn is_summarizer(self) -> bool {
        matches!(self, ModelRole::Summary | ModelRole::FallbackSummary)
    }
}

/// Whether a probed model answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// The model answered successfully
    Ok,
    /// The call failed
    Error,
}

/// Result of probing one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProbe {
    /// Model name
    pub model: String,

    /// Configured role
    pub role: ModelRole,

    /// Configured priority, lower first
    pub priority: u8,

    /// Outcome
    pub status: ProbeStatus,

    /// Wall time of the call
    pub latency_ms: u64,

    /// Start of the answer on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,

    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Report over all configured models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeReport {
    /// Whether a credential was available
    pub configured: bool,

    /// Redacted credential preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_preview: Option<String>,

    /// Per-model results, working models first, then by priority
    pub results: Vec<ModelProbe>,

    /// Number of models that answered
    pub working: usize,

    /// First working summarization model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl ProbeReport {
    /// Report for a run without credential
    pub fn not_configured() -> Self {
        Self {
            configured: false,
            key_preview: None,
            results: Vec::new(),
            working: 0,
            recommendation: None,
        }
    }
}

async fn probe_one<B: InferenceBackend>(
    backend: &B,
    config: &InferenceConfig,
    model: &str,
    role: ModelRole,
    timeout: Duration,
) -> Result<String, InferenceError> {
    let call = async {
        match role {
            ModelRole::Summary | ModelRole::FallbackSummary => {
                let request = SummarizationRequest {
                    inputs: PROBE_PROMPT.to_string(),
                    parameters: SummarizationParameters {
                        max_length: 50,
                        min_length: None,
                        do_sample: Some(true),
                        temperature: Some(0.3),
                    },
                };
                let items = backend.summarize(model, &request, timeout).await?;
                Ok(items
                    .into_iter()
                    .next()
                    .and_then(|item| item.summary_text.or(item.generated_text))
                    .unwrap_or_else(|| "Response received".to_string()))
            }
            ModelRole::Classifier => {
                let request = ClassificationRequest {
                    inputs: PROBE_PROMPT.to_string(),
                    parameters: ClassificationParameters {
                        candidate_labels: config.candidate_labels.clone(),
                    },
                };
                let response = backend.classify(model, &request, timeout).await?;
                Ok(response
                    .labels
                    .and_then(|labels| labels.into_iter().next())
                    .map(|label| format!("top label: {}", label))
                    .unwrap_or_else(|| "Response received".to_string()))
            }
        }
    };

    tokio::time::timeout(timeout, call)
        .await
        .unwrap_or_else(|_| Err(InferenceError::Timeout(timeout.as_millis() as u64)))
}

/// Probe every configured model once
///
/// Without a backend (no credential) the report says so instead of failing.
#[instrument(skip_all)]
pub async fn probe_models<B: InferenceBackend>(
    backend: Option<&B>,
    config: &InferenceConfig,
) -> ProbeReport {
    let Some(backend) = backend else {
        warn!("No inference credential configured; skipping model probe");
        return ProbeReport::not_configured();
    };

    let targets = [
        (
            config.summary_model.as_str(),
            ModelRole::Summary,
            1u8,
            config.summary_timeout(),
        ),
        (
            config.fallback_summary_model.as_str(),
            ModelRole::FallbackSummary,
            2,
            config.fallback_timeout(),
        ),
        (
            config.classifier_model.as_str(),
            ModelRole::Classifier,
            3,
            config.classification_timeout(),
        ),
    ];

    let mut results = join_all(targets.iter().map(|&(model, role, priority, timeout)| async move {
        let started = Instant::now();
        let outcome = probe_one(backend, config, model, role, timeout).await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(answer) => {
                info!("Model {} answered in {} ms", model, latency_ms);
                ModelProbe {
                    model: model.to_string(),
                    role,
                    priority,
                    status: ProbeStatus::Ok,
                    latency_ms,
                    preview: Some(truncate_chars(answer.trim(), PREVIEW_CHARS).to_string()),
                    error: None,
                }
            }
            Err(e) => {
                warn!("Model {} failed: {}", model, e);
                ModelProbe {
                    model: model.to_string(),
                    role,
                    priority,
                    status: ProbeStatus::Error,
                    latency_ms,
                    preview: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }))
    .await;

    results.sort_by_key(|probe| (probe.status != ProbeStatus::Ok, probe.priority));

    let working = results
        .iter()
        .filter(|probe| probe.status == ProbeStatus::Ok)
        .count();
    let recommendation = results
        .iter()
        .find(|probe| probe.status == ProbeStatus::Ok && probe.role.is_summarizer())
        .map(|probe| probe.model.clone());

    ProbeReport {
        configured: true,
        key_preview: config.token_preview(),
        results,
        working,
        recommendation,
    }
}
