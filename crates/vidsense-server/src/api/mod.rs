mod analyze;
mod videos;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use vidsense_analysis::{AnalysisError, Analyzer};
use vidsense_store::{StoreClient, StoreError};

use crate::middleware::{is_origin_allowed, request_id, RequestId};

/// Largest accepted JSON request body (a full video document with comments).
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Analyzer,
    pub search_max_results: usize,
}

impl AppState {
    fn store(&self) -> &StoreClient {
        self.analyzer.store()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    store: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" | "no_matches" | "no_comments" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "payload_too_large" => StatusCode::PAYLOAD_TOO_LARGE,
            "timeout" => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(request_id: String, error: &StoreError) -> ApiError {
    match error {
        StoreError::NotFound => ApiError::new(request_id, "not_found", "video not found"),
        other => {
            tracing::error!(error = %other, "document store request failed");
            ApiError::new(request_id, "store_unavailable", "document store unavailable")
        }
    }
}

pub(super) fn map_analysis_error(request_id: String, error: &AnalysisError) -> ApiError {
    match error {
        AnalysisError::NotFound => ApiError::new(request_id, "not_found", "video not found"),
        AnalysisError::NoMatches => ApiError::new(
            request_id,
            "no_matches",
            "no comments found containing the keyword",
        ),
        AnalysisError::NoComments => {
            ApiError::new(request_id, "no_comments", "no valid comments extracted")
        }
        AnalysisError::StoreUnavailable(e) => {
            tracing::error!(error = %e, "document store request failed during analysis");
            ApiError::new(request_id, "store_unavailable", "document store unavailable")
        }
        AnalysisError::ScoringUnavailable(e) => {
            tracing::error!(error = %e, "scoring backend request failed");
            ApiError::new(
                request_id,
                "scoring_unavailable",
                "scoring backend unavailable",
            )
        }
        AnalysisError::ScoringResponseMalformed(reason) => {
            tracing::error!(reason = %reason, "scoring backend returned malformed response");
            ApiError::new(
                request_id,
                "scoring_malformed",
                "scoring backend returned a malformed response",
            )
        }
        AnalysisError::DeadlineExceeded(limit) => {
            tracing::warn!(deadline_secs = limit.as_secs_f64(), "analysis timed out");
            ApiError::new(request_id, "timeout", "analysis timed out")
        }
        AnalysisError::InvalidEndpoint { .. } => {
            tracing::error!(error = %error, "scoring endpoint misconfigured");
            ApiError::new(request_id, "internal_error", "internal error")
        }
    }
}

fn build_cors(allowed_origins: Vec<String>) -> CorsLayer {
    let allowlist = Arc::new(allowed_origins);
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts| {
                origin
                    .to_str()
                    .is_ok_and(|o| is_origin_allowed(o, &allowlist))
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([HeaderName::from_static("x-request-id")])
        .allow_credentials(true)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route(
            "/api/videos",
            get(videos::list_video_ids).post(videos::upsert_video),
        )
        .route(
            "/api/videos/{video_id}",
            get(videos::get_video).delete(videos::delete_video),
        )
        .route("/api/videoCount", get(videos::count_videos))
        .route(
            "/api/videos/videoCategory/{category}",
            get(videos::list_by_category),
        )
        .route("/api/videos/brands/{brand}", get(videos::list_by_brand))
        .route("/api/analyze/{video_id}", get(analyze::analyze_video))
        .route(
            "/api/analyze/keyword/{keyword}",
            get(analyze::analyze_keyword),
        )
}

pub fn build_app(state: AppState, allowed_origins: Vec<String>) -> Router {
    api_router()
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors(allowed_origins))
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::new(
                req_id.0,
                HealthData {
                    status: "ok",
                    store: "ok",
                },
            )),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: document store unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::new(
                    req_id.0,
                    HealthData {
                        status: "degraded",
                        store: "unavailable",
                    },
                )),
            )
        }
    }
}
