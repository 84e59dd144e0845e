use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
}

/// NFKC-normalize, lower-case and trim. Keywords and catalog text both go
/// through this so full-width or compatibility forms compare equal.
pub fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase().trim().to_string()
}

/// Tokenize text into lower-cased alphanumeric words. Any run of other
/// characters separates tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    WORD.find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Tokenize and drop repeats, keeping first-seen order.
pub fn tokenize_unique(text: &str) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// Number of whitespace-separated words, the denominator of ranking scores.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
