use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use search_core::{CourseId, EngineError};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Word frequency asked about a course that does not exist.
    MissingCourse(CourseId),
    Unauthorized(String),
    Internal(anyhow::Error),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidInput(msg) => ApiError::BadRequest(msg),
            EngineError::CourseNotFound(id) => ApiError::MissingCourse(id),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "success": false, "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "success": false, "error": msg })),
            ApiError::MissingCourse(id) => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "error": "Course not found", "courseId": id, "frequency": 0 }),
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, json!({ "success": false, "error": msg })),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "success": false, "error": "internal error" }))
            }
        };
        (status, Json(body)).into_response()
    }
}
