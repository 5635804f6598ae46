//! Candidate labels offered to the classifier and their canonical tags

/// Labels sent as `candidate_labels` to the zero-shot classifier
pub const CANDIDATE_LABELS: &[&str] = &[
    // gaming
    "gaming",
    "video games",
    "game mod",
    "steam workshop",
    "indie games",
    // technology
    "software",
    "programming",
    "web development",
    "tools",
    "tutorial",
    "documentation",
    // content and media
    "entertainment",
    "creative",
    "art",
    "music",
    "video",
    // education
    "education",
    "learning",
    "guide",
    "mathematics",
    // productivity
    "productivity",
    "business",
    "office",
    // generic
    "community",
    "social",
    "news",
    "blog",
    "review",
];

/// Raw classifier label to canonical tag, in declaration order
pub const LABEL_TO_TAG: &[(&str, &str)] = &[
    ("gaming", "games"),
    ("video games", "games"),
    ("game mod", "mod"),
    ("steam workshop", "steam"),
    ("indie games", "indie"),
    ("software", "software"),
    ("programming", "programacao"),
    ("web development", "web-development"),
    ("tools", "ferramentas"),
    ("tutorial", "tutorial"),
    ("entertainment", "entretenimento"),
    ("creative", "criativo"),
    ("art", "arte"),
    ("music", "musica"),
    ("video", "video"),
    ("education", "educacao"),
    ("learning", "aprendizado"),
    ("guide", "guia"),
    ("documentation", "documentacao"),
    ("community", "comunidade"),
    ("social", "social"),
    ("news", "noticias"),
    ("blog", "blog"),
    ("review", "review"),
    ("mathematics", "matematica"),
    ("productivity", "produtividade"),
    ("business", "negocios"),
    ("office", "escritorio"),
];

/// Canonical tag for a raw classifier label, matched case-insensitively
///
/// Labels outside the vocabulary have no tag and must never reach a result.
pub fn normalize_tag(label: &str) -> Option<&'static str> {
    let label = label.trim().to_lowercase();
    LABEL_TO_TAG
        .iter()
        .find(|(raw, _)| *raw == label)
        .map(|(_, tag)| *tag)
}
