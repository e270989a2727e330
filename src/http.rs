//! HTTP surface — `/api/health`, `/api/columns` and `/api/search`.
//!
//! Handlers fetch the table through [`DatasetCache::get`] on the blocking
//! pool, then run the scan on the async task; the scan is short and holds no
//! locks. Every response carries `Access-Control-Allow-Origin: *`, and
//! `OPTIONS` preflights are answered directly by the CORS middleware.

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use roster_core::{search, DatasetCache, LoadError, Row, SearchOutcome, Table, EMPTY_QUERY_MESSAGE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ColumnsResponse<'t> {
    pub success: bool,
    pub columns: &'t [String],
    pub total_students: usize,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse<'t> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub students: &'t [Row<'t>],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<&'t str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'t str>,
}

impl<'t> From<&'t SearchOutcome<'t>> for SearchResponse<'t> {
    fn from(outcome: &'t SearchOutcome<'t>) -> Self {
        match outcome {
            SearchOutcome::EmptyQuery => Self {
                success: false,
                count: None,
                students: &[],
                search_term: None,
                message: Some(EMPTY_QUERY_MESSAGE),
            },
            SearchOutcome::Found(result) => Self {
                success: true,
                count: Some(result.count()),
                students: &result.rows,
                search_term: Some(&result.query),
                message: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to obtain the table; rendered as a 500.
#[derive(Debug)]
pub enum ApiError {
    Load(LoadError),
    Join(tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Load(err) => err.to_string(),
            ApiError::Join(err) => {
                tracing::error!(error = %err, "dataset loader task failed");
                "internal error".to_string()
            }
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(cache: Arc<DatasetCache>) -> Router {
    Router::new()
        .route("/api/health", get(handle_health))
        .route("/api/columns", get(handle_columns))
        .route("/api/search", get(handle_search))
        .layer(middleware::from_fn(allow_any_origin))
        .with_state(cache)
}

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

async fn allow_any_origin(request: axum::extract::Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return preflight(&request);
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}

/// Any origin, the read-only methods, and whatever headers the browser asked
/// to send.
fn preflight(request: &axum::extract::Request) -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    if let Some(requested) = request.headers().get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
    }
    tracing::debug!(path = %request.uri().path(), "answered CORS preflight");
    response
}

async fn load_table(cache: Arc<DatasetCache>) -> Result<Arc<Table>, ApiError> {
    tokio::task::spawn_blocking(move || cache.get())
        .await
        .map_err(ApiError::Join)?
        .map_err(ApiError::Load)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn handle_health() -> Json<HealthResponse> {
    tracing::info!("GET /api/health");
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    })
}

pub async fn handle_columns(State(cache): State<Arc<DatasetCache>>) -> Result<Response, ApiError> {
    tracing::info!("GET /api/columns");
    let table = load_table(cache).await?;
    Ok(Json(ColumnsResponse {
        success: true,
        columns: table.columns(),
        total_students: table.len(),
    })
    .into_response())
}

pub async fn handle_search(
    State(cache): State<Arc<DatasetCache>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    tracing::info!(q = %params.q.trim(), "GET /api/search");

    // Blank queries never touch the dataset.
    if params.q.trim().is_empty() {
        tracing::warn!("search aborted: empty query");
        let outcome = SearchOutcome::EmptyQuery;
        return Ok(Json(SearchResponse::from(&outcome)).into_response());
    }

    let table = load_table(cache).await?;
    let outcome = search(&table, &params.q);
    Ok(Json(SearchResponse::from(&outcome)).into_response())
}
