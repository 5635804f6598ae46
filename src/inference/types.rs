//! Request and response bodies of the inference endpoints

use serde::{Deserialize, Serialize};

/// Body of a summarization / text generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummarizationRequest {
    /// Prompt text
    pub inputs: String,

    /// Generation parameters
    pub parameters: SummarizationParameters,
}

/// Generation parameters of a summarization request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarizationParameters {
    /// Maximum generated length
    pub max_length: u32,

    /// Minimum generated length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,

    /// Whether to sample instead of decoding greedily
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_sample: Option<bool>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// One element of a summarization or generation response array
///
/// Summarization models answer with `summary_text`, text-to-text models with
/// `generated_text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedText {
    /// Output of summarization models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_text: Option<String>,

    /// Output of text-to-text models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_text: Option<String>,
}

impl GeneratedText {
    /// A `summary_text` element
    pub fn summary(text: impl Into<String>) -> Self {
        Self {
            summary_text: Some(text.into()),
            generated_text: None,
        }
    }

    /// A `generated_text` element
    pub fn generated(text: impl Into<String>) -> Self {
        Self {
            summary_text: None,
            generated_text: Some(text.into()),
        }
    }
}

/// Body of a zero-shot classification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// Text to classify
    pub inputs: String,

    /// Classification parameters
    pub parameters: ClassificationParameters,
}

/// Parameters of a zero-shot classification request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationParameters {
    /// Labels to score
    pub candidate_labels: Vec<String>,
}

/// Zero-shot classification response as sent by the service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResponse {
    /// Classified text, echoed back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,

    /// Labels sorted by descending score
    #[serde(default)]
    pub labels: Option<Vec<String>>,

    /// Scores parallel to `labels`
    #[serde(default)]
    pub scores: Option<Vec<f64>>,
}

impl ClassificationResponse {
    /// A response with the given labels and scores
    pub fn new(labels: &[&str], scores: &[f64]) -> Self {
        Self {
            sequence: None,
            labels: Some(labels.iter().map(|s| s.to_string()).collect()),
            scores: Some(scores.to_vec()),
        }
    }
}

/// A validated label/score distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Labels as returned by the service
    pub labels: Vec<String>,

    /// Scores parallel to `labels`, not necessarily summing to one
    pub scores: Vec<f64>,
}
