pub mod error;
pub mod seed;
pub mod validate;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use search_core::compare::PlatformSummary;
use search_core::patterns::{PatternKind, PatternReport, ValidationReport};
use search_core::persist::{load_snapshot, save_snapshot, SnapshotPaths};
use search_core::spell::SpellCheck;
use search_core::{Catalog, Course, CourseDraft, CourseId, PageRank, SearchEngine, WordFrequency};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub admin_token: Option<String>,
    /// Where admin inserts are persisted, if anywhere.
    pub snapshot_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        Self { engine, admin_token: None, snapshot_dir: None }
    }
}

/// Open the catalog: a snapshot directory if one exists there, otherwise the
/// sample courses when `seed` is set, otherwise an empty catalog.
pub fn open_catalog(snapshot: Option<&FsPath>, seed: bool) -> Result<Arc<Catalog>> {
    if let Some(dir) = snapshot {
        let paths = SnapshotPaths::new(dir);
        if paths.exists() {
            return Ok(Arc::new(load_snapshot(&paths)?));
        }
        tracing::warn!(dir = %dir.display(), "no catalog snapshot found");
    }
    let catalog = Catalog::new();
    if seed {
        let ids = catalog.insert_many(seed::sample_courses());
        tracing::info!(count = ids.len(), "sample courses loaded");
    }
    Ok(Arc::new(catalog))
}

/// CORS from a comma-separated origin list; any origin when unset or unparsable.
pub fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let origins: Vec<_> = allow_origin
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
    }
}

pub fn build_app(state: AppState, cors: CorsLayer) -> Router {
    let courses = Router::new()
        .route("/search", get(search_handler).post(search_post_handler))
        .route("/autocomplete", get(autocomplete_handler).post(autocomplete_post_handler))
        .route("/spellcheck", get(spellcheck_handler).post(spellcheck_post_handler))
        .route("/search-frequency", get(trending_handler))
        .route("/ranking", get(ranking_handler))
        .route("/compare", get(compare_handler))
        .route("/patterns", get(patterns_handler))
        .route("/validation/stats", get(validation_handler))
        .route("/:course_id", get(course_handler))
        .route("/:course_id/frequency", get(word_frequency_handler));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/courses", courses)
        .route("/api/admin/courses", post(admin_insert_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// --- search ---

#[derive(Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchBody {
    pub search: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseHit {
    #[serde(flatten)]
    pub course: Course,
    pub score: f64,
    pub occurrences: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub keyword: String,
    pub count: usize,
    pub courses: Vec<CourseHit>,
}

fn run_search(state: &AppState, keyword: &str) -> Result<Json<SearchResponse>, ApiError> {
    let hits = state.engine.search(keyword)?;
    let courses: Vec<CourseHit> = hits
        .into_iter()
        .map(|h| CourseHit { course: h.course, score: h.score, occurrences: h.occurrences })
        .collect();
    Ok(Json(SearchResponse { success: true, keyword: keyword.to_string(), count: courses.len(), courses }))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let keyword = validate::search_text("keyword", params.keyword.as_deref())?;
    run_search(&state, keyword)
}

pub async fn search_post_handler(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<SearchResponse>, ApiError> {
    let keyword = validate::search_text("search", body.search.as_deref())?;
    run_search(&state, keyword)
}

// --- autocomplete ---

#[derive(Deserialize)]
pub struct AutocompleteParams {
    pub prefix: Option<String>,
}

#[derive(Deserialize)]
pub struct WordBody {
    pub word: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutocompleteResponse {
    pub success: bool,
    pub prefix: String,
    pub suggestions: Vec<String>,
}

fn run_autocomplete(state: &AppState, prefix: &str) -> Json<AutocompleteResponse> {
    let suggestions = state.engine.autocomplete(prefix);
    Json(AutocompleteResponse { success: true, prefix: prefix.to_string(), suggestions })
}

pub async fn autocomplete_handler(
    State(state): State<AppState>,
    Query(params): Query<AutocompleteParams>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let prefix = validate::search_text("prefix", params.prefix.as_deref())?;
    Ok(run_autocomplete(&state, prefix))
}

pub async fn autocomplete_post_handler(
    State(state): State<AppState>,
    Json(body): Json<WordBody>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let prefix = validate::search_text("word", body.word.as_deref())?;
    Ok(run_autocomplete(&state, prefix))
}

// --- spelling ---

#[derive(Deserialize)]
pub struct SpellParams {
    pub word: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellResponse {
    pub success: bool,
    pub word: String,
    pub suggestions: Vec<String>,
    pub has_suggestions: bool,
}

pub async fn spellcheck_handler(
    State(state): State<AppState>,
    Query(params): Query<SpellParams>,
) -> Result<Json<SpellResponse>, ApiError> {
    let word = validate::spell_word("word", params.word.as_deref())?;
    let suggestions = state.engine.spellcheck(word);
    Ok(Json(SpellResponse {
        success: true,
        word: word.to_string(),
        has_suggestions: !suggestions.is_empty(),
        suggestions,
    }))
}

#[derive(Serialize)]
pub struct SpellCheckResponse {
    pub success: bool,
    #[serde(flatten)]
    pub check: SpellCheck,
}

pub async fn spellcheck_post_handler(
    State(state): State<AppState>,
    Json(body): Json<WordBody>,
) -> Result<Json<SpellCheckResponse>, ApiError> {
    let word = validate::spell_word("word", body.word.as_deref())?;
    Ok(Json(SpellCheckResponse { success: true, check: state.engine.check_spelling(word) }))
}

// --- popularity and ranking ---

#[derive(Deserialize)]
pub struct TrendingParams {
    pub limit: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingItem {
    pub keyword: String,
    pub search_count: u64,
    pub last_searched: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponse {
    pub success: bool,
    pub top_searches: Vec<TrendingItem>,
}

pub async fn trending_handler(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> Result<Json<TrendingResponse>, ApiError> {
    let limit = validate::limit("limit", params.limit.as_deref())?;
    let top_searches = state
        .engine
        .trending(limit)
        .into_iter()
        .map(|r| TrendingItem {
            last_searched: r.last_searched_rfc3339(),
            keyword: r.keyword,
            search_count: r.count,
        })
        .collect();
    Ok(Json(TrendingResponse { success: true, top_searches }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingResponse {
    pub success: bool,
    pub keyword: String,
    pub rankings: Vec<PageRank>,
}

pub async fn ranking_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<RankingResponse>, ApiError> {
    let keyword = validate::required("keyword", params.keyword.as_deref())?;
    let rankings = state.engine.page_ranking(keyword);
    Ok(Json(RankingResponse { success: true, keyword: keyword.to_string(), rankings }))
}

// --- per course ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub success: bool,
    pub course: Course,
}

pub async fn course_handler(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = state
        .engine
        .catalog()
        .get(course_id)
        .ok_or_else(|| ApiError::NotFound(format!("course {course_id} not found")))?;
    Ok(Json(CourseResponse { success: true, course }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordFrequencyResponse {
    pub success: bool,
    pub data: WordFrequency,
}

pub async fn word_frequency_handler(
    State(state): State<AppState>,
    Path(course_id): Path<CourseId>,
    Query(params): Query<SpellParams>,
) -> Result<Json<WordFrequencyResponse>, ApiError> {
    let word = validate::required("word", params.word.as_deref())?;
    let data = state.engine.word_frequency(course_id, word)?;
    Ok(Json(WordFrequencyResponse { success: true, data }))
}

// --- catalog reports ---

#[derive(Deserialize)]
pub struct CompareParams {
    pub platforms: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub success: bool,
    pub comparison: BTreeMap<String, PlatformSummary>,
}

pub async fn compare_handler(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Result<Json<CompareResponse>, ApiError> {
    let platforms = validate::required("platforms", params.platforms.as_deref())?;
    let comparison = state.engine.compare_platforms(platforms.split(','));
    Ok(Json(CompareResponse { success: true, comparison }))
}

#[derive(Deserialize)]
pub struct PatternParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn patterns_handler(
    State(state): State<AppState>,
    Query(params): Query<PatternParams>,
) -> Result<Json<PatternReport>, ApiError> {
    let kind: PatternKind = validate::required("type", params.kind.as_deref())?.parse()?;
    Ok(Json(state.engine.find_patterns(kind)))
}

pub async fn validation_handler(State(state): State<AppState>) -> Json<ValidationReport> {
    Json(state.engine.validation_stats())
}

// --- admin ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub success: bool,
    pub ids: Vec<CourseId>,
}

async fn admin_insert_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(drafts): Json<Vec<CourseDraft>>,
) -> Result<Json<InsertResponse>, ApiError> {
    authorize(&state, &headers)?;
    if let Some(blank) = drafts.iter().position(|d| d.title.trim().is_empty()) {
        return Err(ApiError::BadRequest(format!("course {blank} has a blank title")));
    }
    let catalog = state.engine.catalog();
    let ids = catalog.insert_many(drafts);
    tracing::info!(added = ids.len(), total = catalog.len(), "courses inserted");
    if let Some(dir) = &state.snapshot_dir {
        save_snapshot(&SnapshotPaths::new(dir), &catalog.snapshot())?;
    }
    Ok(Json(InsertResponse { success: true, ids }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err(ApiError::Unauthorized("ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("invalid admin token".into()))
    }
}
