use crate::catalog::{Course, CourseId};
use crate::tokenizer::{normalize, tokenize, word_count};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRecord {
    pub course_id: CourseId,
    pub keyword: String,
    pub occurrences: u32,
    /// Occurrences per hundred words of searchable text.
    pub score: f64,
}

/// Whole-token, case-insensitive occurrences of `word` in `text`.
pub fn count_occurrences(text: &str, word: &str) -> u32 {
    let word = normalize(word);
    if word.is_empty() {
        return 0;
    }
    tokenize(text).iter().filter(|t| **t == word).count() as u32
}

/// Term-frequency score as a percentage; zero for empty text.
pub fn term_frequency_score(occurrences: u32, words: usize) -> f64 {
    if words == 0 {
        return 0.0;
    }
    occurrences as f64 / words as f64 * 100.0
}

/// Score every course against `keyword`, keeping only courses that mention it.
/// Output follows input order.
pub fn rank<'a, I>(keyword: &str, courses: I) -> Vec<RankingRecord>
where
    I: IntoIterator<Item = &'a Course>,
{
    let keyword = normalize(keyword);
    courses
        .into_iter()
        .filter_map(|course| {
            let text = course.searchable_text();
            let occurrences = count_occurrences(&text, &keyword);
            (occurrences > 0).then(|| RankingRecord {
                course_id: course.id,
                keyword: keyword.clone(),
                occurrences,
                score: term_frequency_score(occurrences, word_count(&text)),
            })
        })
        .collect()
}

/// Latest ranking per (keyword, course). A new search replaces the previous
/// record for the same pair instead of appending to it.
#[derive(Default)]
pub struct RankingBook {
    by_keyword: DashMap<String, HashMap<CourseId, RankingRecord>>,
}

impl RankingBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, records: Vec<RankingRecord>) {
        for record in records {
            self.by_keyword
                .entry(record.keyword.clone())
                .or_default()
                .insert(record.course_id, record);
        }
    }

    /// Best `n` records for a keyword, highest score first, ties by course id.
    pub fn top(&self, keyword: &str, n: usize) -> Vec<RankingRecord> {
        let keyword = normalize(keyword);
        let Some(records) = self.by_keyword.get(&keyword) else {
            return Vec::new();
        };
        let mut out: Vec<RankingRecord> = records.value().values().cloned().collect();
        drop(records);
        out.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.course_id.cmp(&b.course_id))
        });
        out.truncate(n);
        out
    }

    /// Drop the records of `keyword` whose course fails `keep`. Returns how
    /// many were dropped.
    pub fn retain<F>(&self, keyword: &str, keep: F) -> usize
    where
        F: Fn(CourseId) -> bool,
    {
        let keyword = normalize(keyword);
        let Some(mut records) = self.by_keyword.get_mut(&keyword) else {
            return 0;
        };
        let before = records.len();
        records.retain(|id, _| keep(*id));
        before - records.len()
    }

    pub fn len(&self) -> usize {
        self.by_keyword.iter().map(|e| e.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
