//! # Tagging Module
//!
//! Everything that turns text and classifier scores into user-visible tags.
//!
//! ## Key Components
//!
//! - `select_smart_tags`: three-tier confidence policy over classifier output
//! - `analyze_directly`: deterministic domain and keyword rules, always run
//! - `merge_tags`: AI tags first, then backup tags, deduplicated and bounded
//!
//! All rule tables are ordered slices evaluated in declaration order, so the
//! same input always yields the same tags in the same order.

mod backup;
mod merge;
mod selection;
mod vocabulary;

pub use backup::{DOMAIN_RULES, KEYWORD_RULES, MAX_BACKUP_TAGS, analyze_directly, backup_tags};
pub use merge::{MAX_FINAL_TAGS, merge_tags};
pub use selection::{
    HIGH_CONFIDENCE_THRESHOLD, MAX_AI_TAGS, MEDIUM_CONFIDENCE_THRESHOLD, candidates_from_scores,
    select_smart_tags,
};
pub use vocabulary::{CANDIDATE_LABELS, LABEL_TO_TAG, normalize_tag};

use serde::{Deserialize, Serialize};

/// Which stage produced a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagSource {
    /// Rule A: one of the top three of at least three candidates at or above 0.20
    AiHigh,
    /// Rule B: a candidate at or above 0.15
    AiMedium,
    /// Rule B padding: a candidate below 0.15
    AiLow,
    /// Rule C: best available when nothing reached 0.15
    AiBest,
    /// Domain or keyword rule
    Backup,
}

impl TagSource {
    /// Wire name of the source
    pub fn as_str(&self) -> &'static str {
        match self {
            TagSource::AiHigh => "ai-high",
            TagSource::AiMedium => "ai-medium",
            TagSource::AiLow => "ai-low",
            TagSource::AiBest => "ai-best",
            TagSource::Backup => "backup",
        }
    }
}

impl std::fmt::Display for TagSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classifier label together with its canonical tag and score
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTag {
    /// Label as returned by the classifier
    pub label: String,

    /// Canonical tag, `None` when the label is outside the vocabulary
    pub normalized_tag: Option<String>,

    /// Score in `[0, 1]`
    pub confidence: f64,
}

/// A tag flowing through selection, backup generation and merging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedResult {
    /// Canonical tag
    pub tag: String,

    /// Whole-number percentage, always 0 for backup tags
    pub confidence: u8,

    /// Producing stage
    pub source: TagSource,
}

impl TaggedResult {
    /// A classifier-derived tag with `score` converted to a percentage
    pub fn from_score(tag: impl Into<String>, score: f64, source: TagSource) -> Self {
        let percent = (score * 100.0).round().clamp(0.0, 100.0) as u8;
        Self {
            tag: tag.into(),
            confidence: percent,
            source,
        }
    }

    /// A rule-derived tag
    pub fn backup(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            confidence: 0,
            source: TagSource::Backup,
        }
    }
}
