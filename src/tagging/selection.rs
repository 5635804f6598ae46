//! Smart tag selection over zero-shot classifier scores
//!
//! The classifier scores every candidate label independently, so scores do
//! not sum to one and good tags often land well below 0.5. Selection is a
//! pure function of `(labels, scores)` and is evaluated as three rules, the
//! first matching rule winning:
//!
//! - **A**: three or more candidates at or above [`HIGH_CONFIDENCE_THRESHOLD`]
//!   select exactly the top three (`ai-high`).
//! - **B**: otherwise every candidate at or above [`MEDIUM_CONFIDENCE_THRESHOLD`]
//!   is selected (`ai-medium`) and the best remaining ones pad the result up
//!   to three (`ai-low`).
//! - **C**: otherwise the top three are selected regardless of score (`ai-best`).

use tracing::{debug, trace};

use crate::tagging::vocabulary::normalize_tag;
use crate::tagging::{CandidateTag, TagSource, TaggedResult};

/// Score at or above which a candidate counts as high confidence
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.20;

/// Score at or above which a candidate counts as medium confidence
pub const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.15;

/// Upper bound on tags selected from classifier output
pub const MAX_AI_TAGS: usize = 3;

/// Pair labels with scores and attach canonical tags
///
/// Pairs beyond the shorter of the two lists are ignored.
pub fn candidates_from_scores(labels: &[String], scores: &[f64]) -> Vec<CandidateTag> {
    labels
        .iter()
        .zip(scores)
        .map(|(label, score)| CandidateTag {
            label: label.clone(),
            normalized_tag: normalize_tag(label).map(str::to_string),
            confidence: *score,
        })
        .collect()
}

/// Select up to [`MAX_AI_TAGS`] tags from classifier output
pub fn select_smart_tags(labels: &[String], scores: &[f64]) -> Vec<TaggedResult> {
    let mut ranked: Vec<(String, f64)> = candidates_from_scores(labels, scores)
        .into_iter()
        .filter(|candidate| candidate.confidence.is_finite())
        .filter_map(|candidate| {
            if candidate.normalized_tag.is_none() {
                trace!("Dropping unmapped label \"{}\"", candidate.label);
            }
            candidate.normalized_tag.map(|tag| (tag, candidate.confidence))
        })
        .collect();

    // stable: equal scores keep classifier order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let high_count = ranked
        .iter()
        .filter(|(_, score)| *score >= HIGH_CONFIDENCE_THRESHOLD)
        .count();
    if high_count >= MAX_AI_TAGS {
        debug!("{} candidates at 20%+, keeping the top {}", high_count, MAX_AI_TAGS);
        return ranked
            .into_iter()
            .take(MAX_AI_TAGS)
            .map(|(tag, score)| TaggedResult::from_score(tag, score, TagSource::AiHigh))
            .collect();
    }

    let (medium, rest): (Vec<_>, Vec<_>) = ranked
        .into_iter()
        .partition(|(_, score)| *score >= MEDIUM_CONFIDENCE_THRESHOLD);

    if !medium.is_empty() {
        debug!("{} candidates at 15%+, padding up to {}", medium.len(), MAX_AI_TAGS);
        let padding = MAX_AI_TAGS.saturating_sub(medium.len());
        return medium
            .into_iter()
            .map(|(tag, score)| TaggedResult::from_score(tag, score, TagSource::AiMedium))
            .chain(
                rest.into_iter()
                    .take(padding)
                    .map(|(tag, score)| TaggedResult::from_score(tag, score, TagSource::AiLow)),
            )
            .take(MAX_AI_TAGS)
            .collect();
    }

    debug!("No candidate at 15%+, using the best {} available", MAX_AI_TAGS);
    rest.into_iter()
        .take(MAX_AI_TAGS)
        .map(|(tag, score)| TaggedResult::from_score(tag, score, TagSource::AiBest))
        .collect()
}
