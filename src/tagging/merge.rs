//! Combining classifier and rule tags into the final list

use std::collections::HashSet;

use crate::tagging::TaggedResult;

/// Upper bound on tags in an analysis result
pub const MAX_FINAL_TAGS: usize = 5;

/// AI tags in selection order followed by backup tags, first occurrence of
/// each tag string kept, cut to [`MAX_FINAL_TAGS`]
pub fn merge_tags(ai_tags: &[TaggedResult], backup_tags: &[TaggedResult]) -> Vec<TaggedResult> {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(MAX_FINAL_TAGS);
    for tag in ai_tags.iter().chain(backup_tags) {
        if merged.len() == MAX_FINAL_TAGS {
            break;
        }
        if seen.insert(tag.tag.as_str()) {
            merged.push(tag.clone());
        }
    }
    merged
}
