//! crates/stylist_core/src/normalize.rs
//!
//! Text-normalization helpers used to match free-text answers against the
//! fixed option sets of the survey.

/// Trims and lowercases an answer. Used for matching against enumerated
/// option sets (clothing sizes, fashion styles).
pub fn normalize_input(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Trims, lowercases and strips punctuation from an answer, keeping
/// alphanumerics, underscores and inner whitespace. Used for yes/no and
/// confirm/cancel style answers, where users tend to add "!" or ".".
pub fn normalize_answer(answer: &str) -> String {
    let lowered = answer.trim().to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();
    stripped.trim().to_string()
}
