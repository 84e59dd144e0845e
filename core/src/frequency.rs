use crate::tokenizer::normalize;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFrequencyRecord {
    pub keyword: String,
    pub count: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub last_searched: OffsetDateTime,
}

/// How often each normalized keyword has been searched.
///
/// Keys are sharded; an increment holds only its own shard's lock, so
/// distinct keywords never contend on a global lock.
#[derive(Default)]
pub struct QueryFrequencyTracker {
    counts: DashMap<String, (u64, OffsetDateTime)>,
}

impl QueryFrequencyRecord {
    pub fn last_searched_rfc3339(&self) -> String {
        self.last_searched.format(&Rfc3339).unwrap_or_default()
    }
}

pub fn normalize_keyword(keyword: &str) -> String {
    normalize(keyword)
}

impl QueryFrequencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one search of `keyword` and return the new total.
    /// Blank keywords are not tracked and return 0.
    pub fn record(&self, keyword: &str) -> u64 {
        let key = normalize_keyword(keyword);
        if key.is_empty() {
            return 0;
        }
        let now = OffsetDateTime::now_utc();
        let mut entry = self.counts.entry(key).or_insert((0, now));
        entry.0 += 1;
        entry.1 = now;
        entry.0
    }

    pub fn count(&self, keyword: &str) -> u64 {
        self.counts.get(&normalize_keyword(keyword)).map_or(0, |e| e.value().0)
    }

    pub fn get(&self, keyword: &str) -> Option<QueryFrequencyRecord> {
        let key = normalize_keyword(keyword);
        self.counts.get(&key).map(|e| QueryFrequencyRecord {
            keyword: key.clone(),
            count: e.value().0,
            last_searched: e.value().1,
        })
    }

    /// Most searched keywords, highest count first, ties by keyword.
    pub fn top_n(&self, n: usize) -> Vec<QueryFrequencyRecord> {
        let mut records: Vec<QueryFrequencyRecord> = self
            .counts
            .iter()
            .map(|e| QueryFrequencyRecord {
                keyword: e.key().clone(),
                count: e.value().0,
                last_searched: e.value().1,
            })
            .collect();
        records.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
        records.truncate(n);
        records
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
