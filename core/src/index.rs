use crate::catalog::{Course, CourseId};
use crate::tokenizer::{normalize, tokenize};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Token to course-id postings, rebuilt wholesale from a catalog snapshot.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub postings: HashMap<String, HashSet<CourseId>>,
    pub num_docs: u32,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_courses(courses: &[Course]) -> Self {
        let mut index = Self::new();
        index.build(courses);
        index
    }

    /// Clear and repopulate from the searchable text of every course.
    pub fn build(&mut self, courses: &[Course]) {
        self.postings.clear();
        for course in courses {
            for token in tokenize(&course.searchable_text()) {
                self.postings.entry(token).or_default().insert(course.id);
            }
        }
        self.num_docs = courses.len() as u32;
        tracing::debug!(num_docs = self.num_docs, num_terms = self.postings.len(), "inverted index built");
    }

    /// Exact token match. The keyword is normalized like indexed text.
    pub fn lookup(&self, keyword: &str) -> HashSet<CourseId> {
        self.postings
            .get(normalize(keyword).as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Number of courses containing the token.
    pub fn df(&self, term: &str) -> usize {
        self.postings.get(normalize(term).as_str()).map_or(0, HashSet::len)
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: CourseId, title: &str, category: &str) -> Course {
        Course {
            id,
            title: title.into(),
            description: None,
            category: Some(category.into()),
            platform: "Udemy".into(),
            rating: None,
            price: None,
            url: None,
            level: None,
        }
    }

    #[test]
    fn lookup_is_exact_token() {
        let index = InvertedIndex::from_courses(&[
            course(1, "Complete Python Bootcamp", "Development"),
            course(2, "Java Masterclass", "Development"),
        ]);
        assert_eq!(index.lookup("Python"), HashSet::from([1]));
        assert_eq!(index.lookup("development"), HashSet::from([1, 2]));
        assert!(index.lookup("pyth").is_empty());
        assert_eq!(index.df("development"), 2);
    }

    #[test]
    fn rebuild_drops_stale_postings() {
        let mut index = InvertedIndex::from_courses(&[course(1, "Rust", "Systems")]);
        index.build(&[course(2, "Go", "Systems")]);
        assert!(index.lookup("rust").is_empty());
        assert_eq!(index.num_docs, 1);
    }
}
