//! Request and result documents of the analysis pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tagging::TaggedResult;

/// Input document of an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Page to analyze
    pub url: String,
}

/// Which tag strategy produced `aiGenerated.tags`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMethod {
    /// No inference was attempted
    None,
    /// Zero-shot classification succeeded
    Mnli,
    /// Classification failed; rule-based tags stand in
    Direct,
}

impl AnalysisMethod {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMethod::None => "none",
            AnalysisMethod::Mnli => "mnli",
            AnalysisMethod::Direct => "direct",
        }
    }
}

/// Where the final description came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionSource {
    /// Summarization model
    Ai,
    /// The page's own metadata
    Page,
    /// `Resource from {host}`
    Synthesized,
}

/// Provenance of the tags and description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiGenerated {
    /// Whether the description was written by a model
    pub description: bool,

    /// Tags chosen by the classifier tiers, or the rule tags when it failed
    pub tags: Vec<TaggedResult>,

    /// Tags produced by the rules
    pub backup_tags: Vec<TaggedResult>,

    /// Whether classification succeeded
    pub success: bool,

    /// Tag strategy
    pub method: AnalysisMethod,

    /// Final tags with their provenance
    pub tags_with_confidence: Vec<TaggedResult>,
}

/// Diagnostics of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugInfo {
    /// Hostname of the requested URL
    pub domain: String,
    pub ai_used: bool,
    pub ai_method: AnalysisMethod,
    pub ai_tags_count: usize,
    pub backup_tags_count: usize,
    pub total_tags: usize,

    /// Characters of condensed text sent to inference
    pub content_length: usize,

    /// Blank-line separated blocks in the structured text
    pub structured_blocks: usize,

    pub http_status: u16,
    pub final_url: String,
    pub description_source: DescriptionSource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_error: Option<String>,

    /// When the analysis finished
    pub analyzed_at: DateTime<Utc>,
}

/// Final output of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub title: String,
    pub description: String,

    /// At most five unique tags, classifier tiers first
    pub tags: Vec<String>,

    /// `tags` joined with `", "`
    pub tag_line: String,

    pub ai_generated: AiGenerated,
    pub debug: DebugInfo,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(AnalysisMethod::Mnli).unwrap(), json!("mnli"));
        assert_eq!(serde_json::to_value(AnalysisMethod::None).unwrap(), json!("none"));
        assert_eq!(
            serde_json::to_value(DescriptionSource::Synthesized).unwrap(),
            json!("synthesized")
        );
        assert_eq!(AnalysisMethod::Direct.as_str(), "direct");
    }

    #[test]
    fn test_request_parses_from_json() {
        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(request.url, "https://example.com");
    }
}
