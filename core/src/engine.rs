use crate::catalog::{Catalog, Course, CourseId};
use crate::compare::{self, PlatformSummary};
use crate::completion::CompletionIndex;
use crate::config::{EngineConfig, MatchMode};
use crate::error::{EngineError, Result};
use crate::frequency::{normalize_keyword, QueryFrequencyRecord, QueryFrequencyTracker};
use crate::index::InvertedIndex;
use crate::patterns::{self, PatternKind, PatternReport, ValidationReport};
use crate::ranker::{self, count_occurrences, RankingBook};
use crate::spell::{SpellCheck, Vocabulary};
use crate::tokenizer::{normalize, tokenize_unique};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub course: Course,
    pub score: f64,
    pub occurrences: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordFrequency {
    pub course_id: CourseId,
    pub course_title: String,
    pub word: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRank {
    pub course_id: CourseId,
    pub title: String,
    pub platform: String,
    #[serde(rename = "rankScore")]
    pub score: f64,
    pub occurrences: u32,
}

/// Steps a single search goes through. A search with no matching course goes
/// straight from `Matched` to `Returned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
    Received,
    FrequencyRecorded,
    CompletionUpdated,
    Matched,
    Ranked,
    Returned,
}

/// A value derived from the catalog, valid for one catalog generation.
struct Derived<T> {
    slot: RwLock<Option<(u64, Arc<T>)>>,
}

impl<T> Derived<T> {
    fn new() -> Self {
        Self { slot: RwLock::new(None) }
    }

    fn get_or_build(&self, generation: u64, build: impl FnOnce() -> T) -> Arc<T> {
        if let Some((built_at, value)) = self.slot.read().as_ref() {
            if *built_at == generation {
                return value.clone();
            }
        }
        let value = Arc::new(build());
        let mut slot = self.slot.write();
        // Never replace a newer build with an older one.
        if slot.as_ref().map_or(true, |(built_at, _)| *built_at < generation) {
            *slot = Some((generation, value.clone()));
        }
        value
    }
}

/// Search, completion, spelling and popularity over a shared course catalog.
///
/// Construct once and share behind an `Arc`; every method takes `&self`.
pub struct SearchEngine {
    config: EngineConfig,
    catalog: Arc<Catalog>,
    index: Derived<InvertedIndex>,
    vocabulary: Derived<Vocabulary>,
    completions: CompletionIndex,
    frequencies: QueryFrequencyTracker,
    rankings: RankingBook,
}

impl SearchEngine {
    pub fn new(catalog: Arc<Catalog>, config: EngineConfig) -> Self {
        let completions = CompletionIndex::new(config.min_completion_len, config.completion_limit);
        Self {
            config,
            catalog,
            index: Derived::new(),
            vocabulary: Derived::new(),
            completions,
            frequencies: QueryFrequencyTracker::new(),
            rankings: RankingBook::new(),
        }
    }

    pub fn with_defaults(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, EngineConfig::default())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn completions(&self) -> &CompletionIndex {
        &self.completions
    }

    pub fn frequencies(&self) -> &QueryFrequencyTracker {
        &self.frequencies
    }

    pub fn rankings(&self) -> &RankingBook {
        &self.rankings
    }

    /// Inverted index for the current catalog generation.
    pub fn inverted_index(&self) -> Arc<InvertedIndex> {
        let (generation, courses) = self.catalog.versioned_snapshot();
        self.index.get_or_build(generation, || InvertedIndex::from_courses(&courses))
    }

    /// Spelling vocabulary for the current catalog generation.
    pub fn vocabulary(&self) -> Arc<Vocabulary> {
        let (generation, courses) = self.catalog.versioned_snapshot();
        self.vocabulary
            .get_or_build(generation, || Vocabulary::build(&courses, self.config.min_vocabulary_len))
    }

    /// Normalize a keyword the way catalog text is normalized. `None` means blank.
    fn normalize(&self, keyword: &str) -> Result<Option<String>> {
        if keyword.chars().count() > self.config.max_keyword_len {
            return Err(EngineError::InvalidInput(format!(
                "keyword longer than {} characters",
                self.config.max_keyword_len
            )));
        }
        let normalized = normalize_keyword(keyword);
        Ok((!normalized.is_empty()).then_some(normalized))
    }

    /// Run a search: count the keyword, feed completion, match, rank.
    ///
    /// Hits are ordered by score, highest first; equal scores keep catalog
    /// order. Courses selected by containment but never mentioning the keyword
    /// as a whole word are returned with a zero score.
    pub fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        let mut stage = SearchStage::Received;
        let Some(keyword) = self.normalize(keyword)? else {
            tracing::debug!("blank keyword, nothing to search");
            return Ok(Vec::new());
        };
        tracing::debug!(%keyword, ?stage, "search");

        let count = self.frequencies.record(&keyword);
        stage = SearchStage::FrequencyRecorded;
        tracing::debug!(%keyword, count, ?stage, "search");

        for word in tokenize_unique(&keyword) {
            self.completions.record_usage(&word);
        }
        stage = SearchStage::CompletionUpdated;
        tracing::debug!(%keyword, ?stage, "search");

        let (generation, courses) = self.catalog.versioned_snapshot();
        let matched: Vec<&Course> = match self.config.match_mode {
            MatchMode::Containment => courses
                .iter()
                .filter(|c| {
                    normalize(&c.title).contains(&keyword)
                        || c.category.as_deref().is_some_and(|cat| normalize(cat).contains(&keyword))
                })
                .collect(),
            MatchMode::Token => {
                let index = self.index.get_or_build(generation, || InvertedIndex::from_courses(&courses));
                let ids = index.lookup(&keyword);
                courses.iter().filter(|c| ids.contains(&c.id)).collect()
            }
        };
        stage = SearchStage::Matched;
        tracing::debug!(%keyword, matched = matched.len(), ?stage, "search");

        if matched.is_empty() {
            stage = SearchStage::Returned;
            tracing::debug!(%keyword, ?stage, "search");
            return Ok(Vec::new());
        }

        let records = ranker::rank(&keyword, matched.iter().copied());
        let by_course: HashMap<CourseId, (f64, u32)> =
            records.iter().map(|r| (r.course_id, (r.score, r.occurrences))).collect();
        self.rankings.upsert(records);
        stage = SearchStage::Ranked;
        tracing::debug!(%keyword, ranked = by_course.len(), ?stage, "search");

        let mut hits: Vec<SearchHit> = matched
            .into_iter()
            .map(|course| {
                let (score, occurrences) = by_course.get(&course.id).copied().unwrap_or((0.0, 0));
                SearchHit { course: course.clone(), score, occurrences }
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        stage = SearchStage::Returned;
        tracing::info!(%keyword, hits = hits.len(), ?stage, "search complete");
        Ok(hits)
    }

    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.completions.suggest(prefix)
    }

    pub fn spellcheck(&self, word: &str) -> Vec<String> {
        self.vocabulary()
            .suggest(word, self.config.max_edit_distance, self.config.spelling_limit)
    }

    /// Spelling suggestions plus whether the word is already known.
    pub fn check_spelling(&self, word: &str) -> SpellCheck {
        let vocabulary = self.vocabulary();
        let normalized = normalize(word);
        let spelt_correctly = vocabulary.contains(&normalized);
        let suggestions =
            vocabulary.suggest(&normalized, self.config.max_edit_distance, self.config.spelling_limit);
        let corrected_word = if spelt_correctly { None } else { suggestions.first().cloned() };
        SpellCheck { word: word.to_string(), spelt_correctly, corrected_word, suggestions }
    }

    /// Whole-word occurrences of `word` in one course's searchable text.
    pub fn word_frequency(&self, course_id: CourseId, word: &str) -> Result<WordFrequency> {
        let course = self.catalog.get(course_id).ok_or(EngineError::CourseNotFound(course_id))?;
        let frequency = count_occurrences(&course.searchable_text(), word);
        Ok(WordFrequency {
            course_id,
            course_title: course.title,
            word: word.to_string(),
            frequency,
        })
    }

    /// Most searched keywords. `limit` defaults to the configured page and is capped.
    pub fn trending(&self, limit: Option<usize>) -> Vec<QueryFrequencyRecord> {
        self.frequencies.top_n(self.config.trending_limit(limit))
    }

    /// Latest rankings for a keyword joined with course details. Records of
    /// courses no longer in the catalog are dropped before the page is cut.
    pub fn page_ranking(&self, keyword: &str) -> Vec<PageRank> {
        let courses = self.catalog.snapshot();
        let by_id: HashMap<CourseId, &Course> = courses.iter().map(|c| (c.id, c)).collect();
        let stale = self.rankings.retain(keyword, |id| by_id.contains_key(&id));
        if stale > 0 {
            tracing::debug!(keyword, stale, "dropped rankings of removed courses");
        }
        self.rankings
            .top(keyword, self.config.ranking_page_size)
            .into_iter()
            .filter_map(|record| {
                let course = by_id.get(&record.course_id)?;
                Some(PageRank {
                    course_id: record.course_id,
                    title: course.title.clone(),
                    platform: course.platform.clone(),
                    score: record.score,
                    occurrences: record.occurrences,
                })
            })
            .collect()
    }

    pub fn compare_platforms<'a, I>(&self, names: I) -> BTreeMap<String, PlatformSummary>
    where
        I: IntoIterator<Item = &'a str>,
    {
        compare::compare_platforms(&self.catalog.snapshot(), names)
    }

    pub fn find_patterns(&self, kind: PatternKind) -> PatternReport {
        patterns::find_patterns(&self.catalog.snapshot(), kind)
    }

    pub fn validation_stats(&self) -> ValidationReport {
        patterns::validation_stats(&self.catalog.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CourseDraft;

    fn engine_with(drafts: Vec<CourseDraft>, config: EngineConfig) -> SearchEngine {
        let catalog = Arc::new(Catalog::new());
        catalog.insert_many(drafts);
        SearchEngine::new(catalog, config)
    }

    fn draft(title: &str, description: &str, category: &str) -> CourseDraft {
        CourseDraft {
            title: title.into(),
            description: Some(description.into()),
            category: Some(category.into()),
            platform: "Udemy".into(),
            ..Default::default()
        }
    }

    #[test]
    fn derived_cache_rebuilds_on_new_generation() {
        let cache: Derived<u32> = Derived::new();
        assert_eq!(*cache.get_or_build(1, || 10), 10);
        assert_eq!(*cache.get_or_build(1, || 20), 10);
        assert_eq!(*cache.get_or_build(2, || 30), 30);
        // an older build does not evict the newer one
        assert_eq!(*cache.get_or_build(1, || 40), 40);
        assert_eq!(*cache.get_or_build(2, || 50), 30);
    }

    #[test]
    fn containment_matches_substrings_but_scores_words() {
        let engine = engine_with(vec![draft("Pythonic Patterns", "idioms", "Development")], EngineConfig::default());
        let hits = engine.search("python").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].occurrences, 0);
        assert_eq!(hits[0].score, 0.0);
        assert!(engine.rankings().is_empty());
    }

    #[test]
    fn token_mode_uses_inverted_index() {
        let config = EngineConfig { match_mode: MatchMode::Token, ..Default::default() };
        let engine = engine_with(
            vec![draft("Pythonic Patterns", "idioms", "Development"), draft("Python Basics", "start here", "Development")],
            config,
        );
        let hits = engine.search("python").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].course.title, "Python Basics");
    }

    #[test]
    fn description_alone_does_not_select() {
        let engine = engine_with(vec![draft("Data Analysis", "uses python throughout", "Data")], EngineConfig::default());
        assert!(engine.search("python").unwrap().is_empty());
        assert_eq!(engine.frequencies().count("python"), 1);
    }

    #[test]
    fn blank_keyword_touches_nothing() {
        let engine = engine_with(vec![draft("Rust", "systems", "Dev")], EngineConfig::default());
        assert!(engine.search("   ").unwrap().is_empty());
        assert!(engine.frequencies().is_empty());
        assert!(engine.completions().is_empty());
    }

    #[test]
    fn overlong_keyword_is_invalid() {
        let config = EngineConfig { max_keyword_len: 4, ..Default::default() };
        let engine = engine_with(vec![], config);
        assert!(matches!(engine.search("python"), Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn hits_sorted_by_score() {
        let engine = engine_with(
            vec![
                draft("Java for Everyone", "a long introduction to many topics", "Programming"),
                draft("Java Java", "java", "Programming"),
            ],
            EngineConfig::default(),
        );
        let hits = engine.search("java").unwrap();
        assert_eq!(hits[0].course.title, "Java Java");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn vocabulary_follows_catalog_changes() {
        let engine = engine_with(vec![draft("Python", "", "")], EngineConfig::default());
        assert!(engine.spellcheck("kotlim").is_empty());
        engine.catalog().insert(draft("Kotlin", "", ""));
        assert_eq!(engine.spellcheck("kotlim"), vec!["kotlin"]);
    }

    #[test]
    fn spell_check_flags_known_words() {
        let engine = engine_with(vec![draft("Python Bootcamp", "", "")], EngineConfig::default());
        let known = engine.check_spelling("Python");
        assert!(known.spelt_correctly);
        assert_eq!(known.corrected_word, None);
        let typo = engine.check_spelling("pythn");
        assert!(!typo.spelt_correctly);
        assert_eq!(typo.corrected_word.as_deref(), Some("python"));
    }

    #[test]
    fn word_frequency_reports_missing_course() {
        let engine = engine_with(vec![draft("Learn Python", "Python, python!", "Dev")], EngineConfig::default());
        assert_eq!(engine.word_frequency(1, "PYTHON").unwrap().frequency, 3);
        assert_eq!(engine.word_frequency(42, "python"), Err(EngineError::CourseNotFound(42)));
    }

    #[test]
    fn page_ranking_skips_removed_courses() {
        let engine = engine_with(
            vec![draft("Rust rust", "", "Dev"), draft("Rust book", "", "Dev")],
            EngineConfig::default(),
        );
        engine.search("rust").unwrap();
        assert_eq!(engine.page_ranking("rust").len(), 2);
        engine.catalog().remove(1);
        let ranked = engine.page_ranking("Rust");
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].course_id, 2);
    }

    #[test]
    fn removed_course_does_not_shorten_the_page() {
        let drafts = (0..12).map(|i| draft(&format!("Rust course {i}"), "", "Dev")).collect();
        let engine = engine_with(drafts, EngineConfig::default());
        engine.search("rust").unwrap();
        assert_eq!(engine.rankings().len(), 12);
        engine.catalog().remove(1);
        let ranked = engine.page_ranking("rust");
        assert_eq!(ranked.len(), 10);
        assert!(ranked.iter().all(|r| r.course_id != 1));
        assert_eq!(engine.rankings().len(), 11);
    }

    #[test]
    fn full_width_keyword_matches_and_scores() {
        let engine = engine_with(vec![draft("Ｐｙｔｈｏｎ Basics", "", "")], EngineConfig::default());
        assert_eq!(engine.word_frequency(1, "Ｐｙｔｈｏｎ").unwrap().frequency, 1);
        let hits = engine.search("Ｐｙｔｈｏｎ").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].occurrences, 1);
        assert!(hits[0].score > 0.0);
        assert_eq!(engine.frequencies().count("python"), 1);
        assert!(engine.check_spelling("ＰＹＴＨＯＮ").spelt_correctly);
    }
}
