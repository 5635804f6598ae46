//! # Inference Configuration Module
//!
//! Configuration for the summarization and zero-shot classification services:
//! credential, endpoint, model names, per-call timeouts and how much of the
//! condensed text each call receives.
//!
//! ## Key Components
//!
//! - `InferenceConfig`: complete configuration for the inference stage
//! - `InferenceConfigBuilder`: builder pattern implementation for easier configuration
//!
//! A missing credential is a valid configuration: the pipeline then runs on
//! the rule-based tagger alone.

use std::fmt;
use std::time::Duration;

use crate::tagging::CANDIDATE_LABELS;

/// Environment variable holding the bearer credential
pub const API_KEY_ENV: &str = "HUGGINGFACE_API_KEY";

/// Environment variable overriding the service base URL
pub const BASE_URL_ENV: &str = "LINKLENS_INFERENCE_URL";

/// Default service base URL
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Configuration for the inference stage
#[derive(Clone)]
pub struct InferenceConfig {
    /// Bearer credential; `None` disables inference entirely
    pub api_token: Option<String>,

    /// Base URL of the inference service
    pub base_url: String,

    /// Primary summarization model
    pub summary_model: String,

    /// Smaller summarization model tried once when the primary fails
    pub fallback_summary_model: String,

    /// Zero-shot classification model
    pub classifier_model: String,

    /// Timeout of the primary summarization call in milliseconds
    pub summary_timeout_ms: u64,

    /// Timeout of the fallback summarization call in milliseconds
    pub fallback_timeout_ms: u64,

    /// Timeout of the classification call in milliseconds
    pub classification_timeout_ms: u64,

    /// Characters of condensed text sent to the primary summarizer
    pub summary_input_chars: usize,

    /// Characters of condensed text sent to the fallback summarizer
    pub fallback_input_chars: usize,

    /// Characters of condensed text sent to the classifier
    pub classification_input_chars: usize,

    /// Labels offered to the classifier
    pub candidate_labels: Vec<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            summary_model: "facebook/bart-large-cnn".to_string(),
            fallback_summary_model: "google/flan-t5-small".to_string(),
            classifier_model: "facebook/bart-large-mnli".to_string(),
            summary_timeout_ms: 15_000,
            fallback_timeout_ms: 10_000,
            classification_timeout_ms: 15_000,
            summary_input_chars: 1000,
            fallback_input_chars: 800,
            classification_input_chars: 1200,
            candidate_labels: CANDIDATE_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_token", &self.token_preview())
            .field("base_url", &self.base_url)
            .field("summary_model", &self.summary_model)
            .field("fallback_summary_model", &self.fallback_summary_model)
            .field("classifier_model", &self.classifier_model)
            .field("summary_timeout_ms", &self.summary_timeout_ms)
            .field("fallback_timeout_ms", &self.fallback_timeout_ms)
            .field("classification_timeout_ms", &self.classification_timeout_ms)
            .field("candidate_labels", &self.candidate_labels.len())
            .finish()
    }
}

/// Builder for InferenceConfig
#[derive(Debug, Default)]
pub struct InferenceConfigBuilder {
    config: InferenceConfig,
}

impl InferenceConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: InferenceConfig::default(),
        }
    }

    /// Set the bearer credential; blank values count as absent
    pub fn api_token(mut self, api_token: Option<String>) -> Self {
        self.config.api_token = api_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    /// Set the service base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the primary summarization model
    pub fn summary_model(mut self, model: impl Into<String>) -> Self {
        self.config.summary_model = model.into();
        self
    }

    /// Set the fallback summarization model
    pub fn fallback_summary_model(mut self, model: impl Into<String>) -> Self {
        self.config.fallback_summary_model = model.into();
        self
    }

    /// Set the classification model
    pub fn classifier_model(mut self, model: impl Into<String>) -> Self {
        self.config.classifier_model = model.into();
        self
    }

    /// Set all three call timeouts: primary summary, fallback summary, classification
    pub fn timeouts_ms(mut self, summary: u64, fallback: u64, classification: u64) -> Self {
        self.config.summary_timeout_ms = summary;
        self.config.fallback_timeout_ms = fallback;
        self.config.classification_timeout_ms = classification;
        self
    }

    /// Set the labels offered to the classifier
    pub fn candidate_labels(mut self, labels: Vec<String>) -> Self {
        self.config.candidate_labels = labels;
        self
    }

    /// Build the configuration
    pub fn build(self) -> InferenceConfig {
        self.config
    }
}

impl InferenceConfig {
    /// Create a new builder
    pub fn builder() -> InferenceConfigBuilder {
        InferenceConfigBuilder::new()
    }

    /// Read the credential and base URL override from the process environment
    pub fn from_env() -> Self {
        let mut builder = Self::builder().api_token(std::env::var(API_KEY_ENV).ok());
        if let Some(base_url) = std::env::var(BASE_URL_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    /// Whether a credential is configured
    pub fn has_credential(&self) -> bool {
        self.api_token.is_some()
    }

    /// First eight characters of the credential followed by `...`
    pub fn token_preview(&self) -> Option<String> {
        self.api_token
            .as_ref()
            .map(|t| format!("{}...", t.chars().take(8).collect::<String>()))
    }

    /// Whether the credential has the `hf_` prefix of hosted API tokens
    pub fn token_has_hf_prefix(&self) -> Option<bool> {
        self.api_token.as_ref().map(|t| t.starts_with("hf_"))
    }

    /// Primary summarization timeout
    pub fn summary_timeout(&self) -> Duration {
        Duration::from_millis(self.summary_timeout_ms)
    }

    /// Fallback summarization timeout
    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.fallback_timeout_ms)
    }

    /// Classification timeout
    pub fn classification_timeout(&self) -> Duration {
        Duration::from_millis(self.classification_timeout_ms)
    }
}
