use axum::{
    extract::{Path, State},
    Extension, Json,
};
use vidsense_analysis::{KeywordAnalysis, VideoAnalysis};

use crate::middleware::RequestId;

use super::{map_analysis_error, ApiError, ApiResponse, AppState};

pub(super) async fn analyze_video(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(video_id): Path<String>,
) -> Result<Json<ApiResponse<VideoAnalysis>>, ApiError> {
    let analysis = state
        .analyzer
        .analyze_by_id(&video_id)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, analysis)))
}

pub(super) async fn analyze_keyword(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(keyword): Path<String>,
) -> Result<Json<ApiResponse<KeywordAnalysis>>, ApiError> {
    let analysis = state
        .analyzer
        .analyze_by_keyword(&keyword)
        .await
        .map_err(|e| map_analysis_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(req_id.0, analysis)))
}
