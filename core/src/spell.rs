use crate::catalog::Course;
use crate::tokenizer::{normalize, tokenize};
use serde::Serialize;
use std::collections::HashSet;

/// Distinct catalog words long enough to be worth correcting towards.
///
/// Words keep the order in which they were first seen, which is also the
/// tie-break order for equally distant suggestions.
#[derive(Debug, Default, Clone)]
pub struct Vocabulary {
    words: Vec<String>,
    lookup: HashSet<String>,
}

impl Vocabulary {
    pub fn build(courses: &[Course], min_len: usize) -> Self {
        let mut vocab = Self::default();
        for course in courses {
            for token in tokenize(&course.searchable_text()) {
                if token.chars().count() >= min_len && vocab.lookup.insert(token.clone()) {
                    vocab.words.push(token);
                }
            }
        }
        vocab
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Closest vocabulary words within `max_distance` edits, nearest first.
    pub fn suggest(&self, word: &str, max_distance: usize, limit: usize) -> Vec<String> {
        let query = normalize(word);
        if query.is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(usize, &String)> = self
            .words
            .iter()
            .map(|candidate| (levenshtein(&query, candidate), candidate))
            .filter(|(distance, _)| *distance <= max_distance)
            .collect();
        scored.sort_by_key(|(distance, _)| *distance);
        scored.into_iter().take(limit).map(|(_, w)| w.clone()).collect()
    }
}

/// Result of checking a single word against the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellCheck {
    pub word: String,
    pub spelt_correctly: bool,
    pub corrected_word: Option<String>,
    pub suggestions: Vec<String>,
}

/// Unit-cost edit distance over chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    // Two rolling rows of the DP table.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1]
            } else {
                1 + prev[j - 1].min(prev[j]).min(curr[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
