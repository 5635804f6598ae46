//! # Inference Module
//!
//! Best-effort calls to external text-inference services: a one-sentence
//! summary of the page and a zero-shot classification over the candidate tag
//! vocabulary.
//!
//! ## Key Components
//!
//! - `InferenceBackend`: the seam the orchestrator calls through
//! - `HuggingFaceClient`: hosted inference API implementation
//! - `run_inference`: both calls, concurrently, each with its own fallback policy
//! - `probe_models`: availability check of the configured models
//! - `MockInference`: scripted backend for tests
//!
//! Failures never escape this module as errors of the analysis; they come back
//! as `Err` values inside [`InferenceOutcome`] so the pipeline can degrade.

mod config;
mod error;
mod http;
mod mock;
mod orchestrator;
mod probe;
mod types;

pub use config::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, InferenceConfig, InferenceConfigBuilder,
};
pub use error::InferenceError;
pub use http::HuggingFaceClient;
pub use mock::{MockCall, MockInference, MockReply};
pub use orchestrator::{
    FALLBACK_PROMPT_PREFIX, InferenceOutcome, SUMMARY_PROMPT_PREFIX, Summary, classify_text,
    describe, run_inference,
};
pub use probe::{ModelProbe, ModelRole, PROBE_PROMPT, ProbeReport, ProbeStatus, probe_models};
pub use types::{
    Classification, ClassificationParameters, ClassificationRequest, ClassificationResponse,
    GeneratedText, SummarizationParameters, SummarizationRequest,
};

use std::future::Future;
use std::time::Duration;

/// A service able to summarize and classify text
pub trait InferenceBackend {
    /// Run a summarization or text generation model
    fn summarize(
        &self,
        model: &str,
        request: &SummarizationRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<GeneratedText>, InferenceError>> + Send;

    /// Run a zero-shot classification model
    fn classify(
        &self,
        model: &str,
        request: &ClassificationRequest,
        timeout: Duration,
    ) -> impl Future<Output = Result<ClassificationResponse, InferenceError>> + Send;
}

impl InferenceBackend for HuggingFaceClient {
    async fn summarize(
        &self,
        model: &str,
        request: &SummarizationRequest,
        timeout: Duration,
    ) -> Result<Vec<GeneratedText>, InferenceError> {
        self.post(model, request, timeout).await
    }

    async fn classify(
        &self,
        model: &str,
        request: &ClassificationRequest,
        timeout: Duration,
    ) -> Result<ClassificationResponse, InferenceError> {
        self.post(model, request, timeout).await
    }
}
