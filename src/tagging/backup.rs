//! Rule-based tagging that needs no external service
//!
//! Runs on every analysis. It is the only tag source when classification
//! fails and a safety net behind the classifier tags otherwise.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::tagging::TaggedResult;

/// Upper bound on tags produced by the rules
pub const MAX_BACKUP_TAGS: usize = 3;

/// Host substring to tags. A pattern matches when the host contains the
/// pattern with its first `.com` removed.
pub const DOMAIN_RULES: &[(&str, &[&str])] = &[
    ("steamcommunity.com", &["games", "steam", "gaming"]),
    ("github.com", &["codigo", "open-source", "programacao"]),
    ("youtube.com", &["video", "entretenimento"]),
    ("medium.com", &["artigo", "blog"]),
    ("stackoverflow.com", &["programacao", "q-a"]),
    ("reddit.com", &["forum", "comunidade"]),
    ("gsmarena.com", &["smartphone", "review", "tecnologia"]),
    ("krea.ai", &["inteligencia-artificial", "criativo"]),
    ("docs.google.com", &["documentos", "produtividade", "google"]),
    ("drive.google.com", &["armazenamento", "google", "produtividade"]),
    ("sheets.google.com", &["planilhas", "google", "produtividade"]),
    ("calculator", &["calculadora", "matematica", "ferramentas"]),
    ("integral-calculator", &["matematica", "calculo", "educacao"]),
    ("wolframalpha", &["matematica", "ciencia", "educacao"]),
    ("notion.so", &["produtividade", "organizacao", "notas"]),
    ("figma.com", &["design", "ui-ux", "criativo"]),
    ("canva.com", &["design", "criativo", "ferramentas"]),
];

/// Case-insensitive pattern to tags, tested against title and content
pub const KEYWORD_RULES: &[(&str, &[&str])] = &[
    ("game|gaming|mod|workshop|steam|rimworld|medieval", &["games", "gaming"]),
    ("video|youtube|watch|meditation|ambience", &["video", "entretenimento"]),
    ("rpg|maker|decrypt|tool", &["games", "ferramentas"]),
    ("ai|artificial|intelligence|machine|learning", &["inteligencia-artificial"]),
    ("phone|smartphone|mobile|android|ios", &["smartphone", "mobile"]),
    ("tutorial|guide|how|learn", &["tutorial", "educacao"]),
    ("review|analysis|test", &["review", "analise"]),
    ("music|audio|sound|meditation", &["musica", "audio"]),
    ("programming|code|developer|api", &["programacao", "desenvolvimento"]),
    ("docs|document|google docs|sign.in", &["documentos", "produtividade"]),
    ("calculator|integral|math|calculus|derivative", &["matematica", "calculadora"]),
    ("step.by.step|solution|solve", &["tutorial", "educacao"]),
    ("online tool|free tool|web tool", &["ferramentas", "web"]),
    ("productivity|organize|workspace", &["produtividade", "organizacao"]),
    ("design|creative|art|draw", &["design", "criativo"]),
];

fn compiled_keyword_rules() -> &'static [(Regex, &'static [&'static str])] {
    static RULES: OnceLock<Vec<(Regex, &'static [&'static str])>> = OnceLock::new();
    RULES.get_or_init(|| {
        KEYWORD_RULES
            .iter()
            .filter_map(|(pattern, tags)| {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(regex) => Some((regex, *tags)),
                    Err(e) => {
                        warn!("Skipping keyword rule \"{}\": {}", pattern, e);
                        None
                    }
                }
            })
            .collect()
    })
}

fn push_unique(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

/// Tags for a page from domain and keyword rules, at most [`MAX_BACKUP_TAGS`]
///
/// Domain rules are applied first, then keyword rules against the lowercased
/// `title + " " + content`, both in declaration order.
pub fn analyze_directly(content: &str, title: &str, host: &str) -> Vec<String> {
    let host = host.to_lowercase();
    let mut tags = Vec::new();

    for (pattern, rule_tags) in DOMAIN_RULES {
        let needle = pattern.replacen(".com", "", 1);
        if host.contains(&needle) {
            debug!("Domain rule {} matched: {:?}", pattern, rule_tags);
            for tag in rule_tags.iter() {
                push_unique(&mut tags, tag);
            }
        }
    }

    let full_text = format!("{} {}", title, content).to_lowercase();
    for (regex, rule_tags) in compiled_keyword_rules() {
        if regex.is_match(&full_text) {
            for tag in rule_tags.iter() {
                if !tags.iter().any(|t| t == tag) {
                    debug!("Keyword rule \"{}\" added \"{}\"", regex.as_str(), tag);
                    tags.push(tag.to_string());
                }
            }
        }
    }

    tags.truncate(MAX_BACKUP_TAGS);
    tags
}

/// [`analyze_directly`] wrapped as backup-sourced results
pub fn backup_tags(content: &str, title: &str, host: &str) -> Vec<TaggedResult> {
    analyze_directly(content, title, host)
        .into_iter()
        .map(TaggedResult::backup)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagging::TagSource;

    #[test]
    fn test_domain_rule_wins_first_slots() {
        let tags = analyze_directly(
            "A library for parsing command line arguments",
            "clap-rs/clap",
            "github.com",
        );
        assert_eq!(tags, vec!["codigo", "open-source", "programacao"]);
    }

    #[test]
    fn test_domain_pattern_drops_dot_com() {
        let tags = analyze_directly("", "", "music.youtube.co.uk");
        assert_eq!(&tags[..2], &["video", "entretenimento"]);
    }

    #[test]
    fn test_overlapping_domain_rules_are_deduplicated() {
        let tags = analyze_directly("", "", "www.integral-calculator.com");
        assert_eq!(tags, vec!["calculadora", "matematica", "ferramentas"]);
    }

    #[test]
    fn test_keyword_rules_in_order() {
        let tags = analyze_directly(
            "Watch and download the best RimWorld mods from the workshop",
            "Steam Workshop",
            "example.org",
        );
        assert_eq!(tags, vec!["games", "gaming", "video"]);
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let tags = analyze_directly("", "CALCULUS DERIVATIVE SOLVER", "example.org");
        assert!(tags.contains(&"matematica".to_string()));
    }

    #[test]
    fn test_no_rule_matches() {
        assert!(analyze_directly("", "", "example.org").is_empty());
    }

    #[test]
    fn test_backup_tags_carry_zero_confidence() {
        let tags = backup_tags("", "", "figma.com");
        assert_eq!(tags.len(), 3);
        assert!(
            tags.iter()
                .all(|t| t.source == TagSource::Backup && t.confidence == 0)
        );
    }
}
