pub mod catalog;
pub mod compare;
pub mod completion;
pub mod config;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod index;
pub mod patterns;
pub mod persist;
pub mod ranker;
pub mod spell;
pub mod tokenizer;

pub use catalog::{Catalog, Course, CourseDraft, CourseId};
pub use config::{EngineConfig, MatchMode};
pub use engine::{PageRank, SearchEngine, SearchHit, WordFrequency};
pub use error::{EngineError, Result};
pub use index::InvertedIndex;
