//! Character-based length and truncation helpers
//!
//! Every length limit in the pipeline counts characters, not bytes, so
//! multi-byte text is never cut in the middle of a code point.

/// Number of characters in `s`
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The longest prefix of `s` holding at most `max_chars` characters
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
