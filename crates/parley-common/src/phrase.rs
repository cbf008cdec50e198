//! Trigger phrase normalization shared by config validation and matching.

/// Lowercase, turn punctuation into spaces and collapse whitespace.
///
/// Apostrophes are kept so "let's" stays one word.
pub fn normalize_phrase(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '\'' { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
