use crate::tokenizer::normalize;
use dashmap::DashMap;
use std::collections::HashMap;

/// Prefix completion weighted by how often each word was searched.
///
/// Every recorded word gets one counter per prefix length. Upserts go through
/// the map's entry API, which holds the shard lock, so concurrent first
/// inserts of the same key never duplicate and increments are not lost.
pub struct CompletionIndex {
    // prefix -> completed word -> usage count
    entries: DashMap<String, HashMap<String, u64>>,
    min_len: usize,
    limit: usize,
}

impl CompletionIndex {
    pub fn new(min_len: usize, limit: usize) -> Self {
        Self { entries: DashMap::new(), min_len, limit }
    }

    /// Bump the counter of every (prefix, word) pair of `word`.
    pub fn record_usage(&self, word: &str) {
        let word = normalize(word);
        if word.is_empty() || word.chars().count() < self.min_len {
            return;
        }
        for (end, ch) in word.char_indices() {
            let prefix = &word[..end + ch.len_utf8()];
            *self
                .entries
                .entry(prefix.to_string())
                .or_default()
                .entry(word.clone())
                .or_insert(0) += 1;
        }
    }

    /// Recorded usage for an exact (prefix, word) pair.
    pub fn usage(&self, prefix: &str, word: &str) -> Option<u64> {
        self.entries
            .get(&normalize(prefix))
            .and_then(|words| words.value().get(&normalize(word)).copied())
    }

    /// Words completing `prefix`, most used first, ties by word.
    ///
    /// Every prefix of a recorded word is its own key, so the entry for the
    /// query already holds every completion.
    pub fn suggest_with_usage(&self, prefix: &str) -> Vec<(String, u64)> {
        let query = normalize(prefix);
        if query.is_empty() {
            return Vec::new();
        }
        let Some(words) = self.entries.get(&query) else {
            return Vec::new();
        };
        let mut ranked: Vec<(String, u64)> =
            words.value().iter().map(|(w, count)| (w.clone(), *count)).collect();
        drop(words);
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.limit);
        ranked
    }

    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        self.suggest_with_usage(prefix).into_iter().map(|(w, _)| w).collect()
    }

    /// Number of distinct prefixes recorded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_accumulates() {
        let idx = CompletionIndex::new(2, 10);
        idx.record_usage("python");
        assert_eq!(idx.suggest_with_usage("py"), vec![("python".to_string(), 1)]);
        idx.record_usage("Python");
        idx.record_usage("python");
        assert_eq!(idx.usage("py", "python"), Some(3));
        assert_eq!(idx.usage("python", "python"), Some(3));
    }

    #[test]
    fn every_prefix_gets_an_entry() {
        let idx = CompletionIndex::new(2, 10);
        idx.record_usage("java");
        for p in ["j", "ja", "jav", "java"] {
            assert_eq!(idx.usage(p, "java"), Some(1), "prefix {p}");
        }
        assert_eq!(idx.len(), 4);
    }

    #[test]
    fn short_words_are_ignored() {
        let idx = CompletionIndex::new(2, 10);
        idx.record_usage("r");
        idx.record_usage("  ");
        assert!(idx.is_empty());
    }

    #[test]
    fn ordered_by_usage_then_word() {
        let idx = CompletionIndex::new(2, 10);
        idx.record_usage("pandas");
        idx.record_usage("python");
        idx.record_usage("python");
        idx.record_usage("pytorch");
        assert_eq!(idx.suggest("P"), vec!["python", "pandas", "pytorch"]);
        assert_eq!(idx.suggest("pyt"), vec!["python", "pytorch"]);
    }

    #[test]
    fn unknown_prefix_and_full_width_query() {
        let idx = CompletionIndex::new(2, 10);
        idx.record_usage("python");
        assert!(idx.suggest("pz").is_empty());
        assert_eq!(idx.suggest("ＰＹ"), vec!["python"]);
    }

    #[test]
    fn empty_prefix_and_limit() {
        let idx = CompletionIndex::new(2, 3);
        for w in ["aa", "ab", "ac", "ad", "ae"] {
            idx.record_usage(w);
        }
        assert!(idx.suggest("").is_empty());
        assert_eq!(idx.suggest("a").len(), 3);
    }
}
