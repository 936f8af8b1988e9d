use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use vidsense_core::{VideoDocument, BRAND_CATEGORY};

use crate::middleware::RequestId;

use super::{map_store_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CountData {
    count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct VideoRef {
    video_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeletedData {
    video_id: String,
    deleted: bool,
}

pub(super) async fn list_video_ids(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let ids = state
        .store()
        .list_ids(state.search_max_results)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, ids)))
}

pub(super) async fn get_video(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiResponse<VideoDocument>>, ApiError> {
    let document = state
        .store()
        .get_by_id(&video_id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, document)))
}

pub(super) async fn count_videos(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<CountData>>, ApiError> {
    let count = state
        .store()
        .count_all()
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, CountData { count })))
}

pub(super) async fn list_by_category(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(category): Path<String>,
) -> Result<Json<ApiResponse<Vec<VideoDocument>>>, ApiError> {
    let documents = state
        .store()
        .search_by_term("videoCategory", &category, state.search_max_results)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    if documents.is_empty() {
        tracing::info!(category, "no videos found for category");
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no videos found for this category",
        ));
    }

    Ok(Json(ApiResponse::new(req_id.0, documents)))
}

pub(super) async fn list_by_brand(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(brand): Path<String>,
) -> Result<Json<ApiResponse<Vec<VideoDocument>>>, ApiError> {
    let documents = state
        .store()
        .search_by_terms(
            &[("videoCategory", BRAND_CATEGORY), ("brandName", brand.as_str())],
            state.search_max_results,
        )
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    if documents.is_empty() {
        tracing::info!(brand, "no videos found for brand");
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            "no videos found for this brand",
        ));
    }

    Ok(Json(ApiResponse::new(req_id.0, documents)))
}

pub(super) async fn delete_video(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiResponse<DeletedData>>, ApiError> {
    state
        .store()
        .delete_by_id(&video_id)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    tracing::info!(video_id, "video deleted");
    Ok(Json(ApiResponse::new(
        req_id.0,
        DeletedData {
            video_id,
            deleted: true,
        },
    )))
}

/// Full replace of the document keyed by the body's `videoId`.
pub(super) async fn upsert_video(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<VideoDocument>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<VideoRef>>), ApiError> {
    let Json(document) = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::new(
                req_id.0.clone(),
                "payload_too_large",
                "request body exceeds 20 MiB",
            )
        } else {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("invalid video document: {}", rejection.body_text()),
            )
        }
    })?;

    let video_id = match document.video_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "videoId is required",
            ))
        }
    };

    state
        .store()
        .upsert(&video_id, &document)
        .await
        .map_err(|e| map_store_error(req_id.0.clone(), &e))?;

    tracing::info!(video_id, "video upserted");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(req_id.0, VideoRef { video_id })),
    ))
}
