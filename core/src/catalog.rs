use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type CourseId = u64;

/// A catalog entry. Searchable text is title, description and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub platform: String,
    /// Free-text rating as scraped, e.g. "4.6".
    pub rating: Option<String>,
    /// Free-text price as scraped, e.g. "$19.99" or "Free".
    pub price: Option<String>,
    pub url: Option<String>,
    pub level: Option<String>,
}

impl Course {
    /// Title, description and category joined by spaces, original casing.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.description.as_deref().unwrap_or(""),
            self.category.as_deref().unwrap_or("")
        )
    }
}

/// Course fields as supplied by an importer, before an id is assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub platform: String,
    pub rating: Option<String>,
    pub price: Option<String>,
    pub url: Option<String>,
    pub level: Option<String>,
}

impl CourseDraft {
    fn into_course(self, id: CourseId) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            platform: self.platform,
            rating: self.rating,
            price: self.price,
            url: self.url,
            level: self.level,
        }
    }
}

struct CatalogState {
    generation: u64,
    courses: Arc<Vec<Course>>,
}

/// In-process course store.
///
/// Readers take an `Arc` snapshot and never block writers for longer than the
/// pointer swap. Every mutation bumps the generation, which derived indexes
/// use to detect staleness.
pub struct Catalog {
    state: RwLock<CatalogState>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::from_courses(Vec::new())
    }

    pub fn from_courses(courses: Vec<Course>) -> Self {
        Self {
            state: RwLock::new(CatalogState { generation: 0, courses: Arc::new(courses) }),
        }
    }

    pub fn snapshot(&self) -> Arc<Vec<Course>> {
        self.state.read().courses.clone()
    }

    /// Snapshot together with the generation it belongs to.
    pub fn versioned_snapshot(&self) -> (u64, Arc<Vec<Course>>) {
        let state = self.state.read();
        (state.generation, state.courses.clone())
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn len(&self) -> usize {
        self.state.read().courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: CourseId) -> Option<Course> {
        self.state.read().courses.iter().find(|c| c.id == id).cloned()
    }

    pub fn insert(&self, draft: CourseDraft) -> CourseId {
        self.insert_many(std::iter::once(draft))[0]
    }

    /// Insert drafts in order, assigning consecutive ids after the current maximum.
    pub fn insert_many<I>(&self, drafts: I) -> Vec<CourseId>
    where
        I: IntoIterator<Item = CourseDraft>,
    {
        let mut state = self.state.write();
        let mut next_id = state.courses.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let mut courses = (*state.courses).clone();
        let mut ids = Vec::new();
        for draft in drafts {
            courses.push(draft.into_course(next_id));
            ids.push(next_id);
            next_id += 1;
        }
        if !ids.is_empty() {
            state.courses = Arc::new(courses);
            state.generation += 1;
            tracing::debug!(added = ids.len(), generation = state.generation, "catalog updated");
        }
        ids
    }

    pub fn remove(&self, id: CourseId) -> bool {
        let mut state = self.state.write();
        let Some(pos) = state.courses.iter().position(|c| c.id == id) else {
            return false;
        };
        Arc::make_mut(&mut state.courses).remove(pos);
        state.generation += 1;
        true
    }
}
