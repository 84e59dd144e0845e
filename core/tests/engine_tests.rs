use search_core::catalog::{Catalog, CourseDraft};
use search_core::completion::CompletionIndex;
use search_core::frequency::QueryFrequencyTracker;
use search_core::{EngineConfig, SearchEngine};
use std::sync::Arc;
use std::thread;

fn sample_engine() -> SearchEngine {
    let catalog = Arc::new(Catalog::new());
    catalog.insert_many(vec![
        CourseDraft {
            title: "Complete Python Bootcamp".into(),
            description: Some("Learn Python like a Professional! Start from the basics".into()),
            category: Some("Development".into()),
            platform: "Udemy".into(),
            rating: Some("4.6".into()),
            price: Some("$19.99".into()),
            ..Default::default()
        },
        CourseDraft {
            title: "Machine Learning A-Z".into(),
            description: Some("Learn to create Machine Learning Algorithms in Python and R".into()),
            category: Some("Data Science".into()),
            platform: "Coursera".into(),
            rating: Some("4.7".into()),
            price: Some("Free".into()),
            ..Default::default()
        },
        CourseDraft {
            title: "Java Programming Masterclass".into(),
            description: Some("Learn Java In This Comprehensive Course".into()),
            category: Some("Development".into()),
            platform: "Udemy".into(),
            rating: Some("4.5".into()),
            price: Some("$24.99".into()),
            ..Default::default()
        },
    ]);
    SearchEngine::new(catalog, EngineConfig::default())
}

#[test]
fn search_end_to_end() {
    let engine = sample_engine();
    let before = engine.frequencies().count("python");

    let hits = engine.search("Python").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].course.title, "Complete Python Bootcamp");
    assert!(hits[0].score > 0.0);
    assert_eq!(hits[0].occurrences, 2);

    assert_eq!(engine.frequencies().count("python"), before + 1);
    assert_eq!(engine.autocomplete("py"), vec!["python"]);

    let ranked = engine.page_ranking("python");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].platform, "Udemy");
}

#[test]
fn category_matches_and_multi_word_queries() {
    let engine = sample_engine();
    assert_eq!(engine.search("development").unwrap().len(), 2);
    assert_eq!(engine.search("machine learning").unwrap().len(), 1);
    assert_eq!(engine.autocomplete("mach"), vec!["machine"]);
    assert_eq!(engine.autocomplete("lea"), vec!["learning"]);
}

#[test]
fn no_match_skips_ranking() {
    let engine = sample_engine();
    assert!(engine.search("haskell").unwrap().is_empty());
    assert!(engine.page_ranking("haskell").is_empty());
    assert_eq!(engine.frequencies().count("haskell"), 1);
}

#[test]
fn repeated_searches_do_not_duplicate_rankings() {
    let engine = sample_engine();
    for _ in 0..3 {
        engine.search("java").unwrap();
    }
    assert_eq!(engine.page_ranking("java").len(), 1);
    assert_eq!(engine.frequencies().count("java"), 3);
    assert_eq!(engine.completions().usage("ja", "java"), Some(3));
}

#[test]
fn spellcheck_reads_catalog_vocabulary() {
    let engine = sample_engine();
    assert!(engine.spellcheck("pythn").contains(&"python".to_string()));
    assert!(engine.spellcheck("zzzzz").is_empty());
    assert!(engine.spellcheck("").is_empty());
}

#[test]
fn compare_platforms_summaries() {
    let engine = sample_engine();
    let cmp = engine.compare_platforms(["Udemy", "Coursera", "Harvard"]);
    assert_eq!(cmp["Udemy"].total_courses, 2);
    assert_eq!(cmp["Udemy"].categories, 1);
    assert_eq!(cmp["Udemy"].price_range, "$19.99 - $24.99");
    assert!((cmp["Udemy"].average_rating - 4.55).abs() < 1e-9);
    assert_eq!(cmp["Coursera"].price_range, "Free - Varies");
    assert_eq!(cmp["Harvard"].average_rating, 0.0);
}

#[test]
fn concurrent_records_are_not_lost() {
    let tracker = Arc::new(QueryFrequencyTracker::new());
    let handles: Vec<_> = (0..100)
        .map(|_| {
            let tracker = tracker.clone();
            thread::spawn(move || {
                tracker.record("python");
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(tracker.count("python"), 100);
}

#[test]
fn concurrent_completion_upserts() {
    let index = Arc::new(CompletionIndex::new(2, 10));
    thread::scope(|s| {
        for _ in 0..8 {
            let index = index.clone();
            s.spawn(move || {
                for _ in 0..25 {
                    index.record_usage("rust");
                }
            });
        }
    });
    assert_eq!(index.usage("r", "rust"), Some(200));
    assert_eq!(index.suggest("ru"), vec!["rust"]);
}

#[test]
fn concurrent_searches_share_one_engine() {
    let engine = Arc::new(sample_engine());
    thread::scope(|s| {
        for i in 0..10 {
            let engine = engine.clone();
            s.spawn(move || {
                let keyword = if i % 2 == 0 { "python" } else { "java" };
                engine.search(keyword).unwrap();
            });
        }
    });
    assert_eq!(engine.frequencies().count("python"), 5);
    assert_eq!(engine.frequencies().count("java"), 5);
}

#[test]
fn trending_is_stable_without_writes() {
    let engine = sample_engine();
    for k in ["java", "python", "rust", "go", "python"] {
        engine.search(k).unwrap();
    }
    let first = engine.trending(None);
    let second = engine.trending(None);
    assert_eq!(first, second);
    assert_eq!(first[0].keyword, "python");
    assert_eq!(first[0].count, 2);
    assert_eq!(engine.trending(Some(2)).len(), 2);
}

#[test]
fn single_letter_keyword_counts_and_ranks_without_completion() {
    let engine = sample_engine();

    let hits = engine.search("R").unwrap();
    assert_eq!(engine.frequencies().count("r"), 1);
    assert!(engine.completions().is_empty());
    assert!(engine.autocomplete("r").is_empty());

    // "Learning" and "Programming" contain the letter, only the ML course has the token
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].course.title, "Machine Learning A-Z");
    assert_eq!(hits[0].occurrences, 1);
    assert_eq!(hits[1].occurrences, 0);

    let ranked = engine.page_ranking("r");
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].title, "Machine Learning A-Z");
    assert_eq!(ranked[0].occurrences, 1);
}
