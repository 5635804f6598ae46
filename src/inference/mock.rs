//! # Mock Inference Backend for Testing
//!
//! Provides a `MockInference` that implements the `InferenceBackend` trait
//! with scripted replies per model, so every fallback path of the pipeline can
//! be exercised without network access. Every call is recorded.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::inference::InferenceBackend;
use crate::inference::error::InferenceError;
use crate::inference::types::{
    ClassificationRequest, ClassificationResponse, GeneratedText, SummarizationRequest,
};

/// Scripted reply of a mocked model
#[derive(Debug, Clone)]
pub enum MockReply<T> {
    /// Answer successfully with the given body
    Ok(T),

    /// Answer with an API error
    Fail {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Never answer; the caller's timeout decides
    Hang,
}

impl<T> MockReply<T> {
    /// An API error reply
    pub fn fail(status: u16, message: impl Into<String>) -> Self {
        Self::Fail {
            status,
            message: message.into(),
        }
    }
}

/// A request received by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    /// A summarization request
    Summarize {
        /// Target model
        model: String,
        /// Request body
        request: SummarizationRequest,
    },

    /// A classification request
    Classify {
        /// Target model
        model: String,
        /// Request body
        request: ClassificationRequest,
    },
}

/// A scripted inference backend for testing purposes.
#[derive(Debug, Clone, Default)]
pub struct MockInference {
    summaries: HashMap<String, MockReply<Vec<GeneratedText>>>,
    classification: Option<MockReply<ClassificationResponse>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockInference {
    /// Creates a mock where every model answers 404.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the reply of a summarization model.
    pub fn with_summary(
        mut self,
        model: impl Into<String>,
        reply: MockReply<Vec<GeneratedText>>,
    ) -> Self {
        self.summaries.insert(model.into(), reply);
        self
    }

    /// Script the reply of the classifier, whatever model is asked.
    pub fn with_classification(mut self, reply: MockReply<ClassificationResponse>) -> Self {
        self.classification = Some(reply);
        self
    }

    /// Calls received so far, in order.
    pub async fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().await.clone()
    }

    async fn record(&self, call: MockCall) {
        self.calls.lock().await.push(call);
    }
}

async fn answer<T>(reply: Option<MockReply<T>>, model: &str) -> Result<T, InferenceError> {
    match reply {
        Some(MockReply::Ok(body)) => Ok(body),
        Some(MockReply::Fail { status, message }) => Err(InferenceError::Api {
            status_code: status,
            message,
        }),
        Some(MockReply::Hang) => std::future::pending().await,
        None => Err(InferenceError::Api {
            status_code: 404,
            message: format!("Model {} not found", model),
        }),
    }
}

impl InferenceBackend for MockInference {
    async fn summarize(
        &self,
        model: &str,
        request: &SummarizationRequest,
        _timeout: Duration,
    ) -> Result<Vec<GeneratedText>, InferenceError> {
        self.record(MockCall::Summarize {
            model: model.to_string(),
            request: request.clone(),
        })
        .await;
        answer(self.summaries.get(model).cloned(), model).await
    }

    async fn classify(
        &self,
        model: &str,
        request: &ClassificationRequest,
        _timeout: Duration,
    ) -> Result<ClassificationResponse, InferenceError> {
        self.record(MockCall::Classify {
            model: model.to_string(),
            request: request.clone(),
        })
        .await;
        answer(self.classification.clone(), model).await
    }
}
