use crate::catalog::CourseId;
use thiserror::Error;

/// Errors surfaced by the search engine.
///
/// Empty or unmatched input is never an error; it produces empty results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("course {0} not found")]
    CourseNotFound(CourseId),
}

pub type Result<T> = std::result::Result<T, EngineError>;
