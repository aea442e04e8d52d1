//! Detection endpoints: one per modality plus the history listing.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use verity_core::{ContentInput, DetectionReport, HistoryEntry, Modality};

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::upload::read_file_part;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct TextDetectionRequest {
    /// Text to analyze
    pub text: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of results (default 10, clamped to the configured maximum)
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HistoryResponse {
    pub results: Vec<HistoryEntry>,
    pub count: usize,
}

#[utoipa::path(
    post,
    path = "/api/v1/detections/text",
    tag = "detections",
    request_body = TextDetectionRequest,
    responses(
        (status = 200, description = "Text analyzed", body = DetectionReport),
        (status = 400, description = "Empty text or malformed body", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(modality = "text"))]
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<TextDetectionRequest>,
) -> Result<Json<DetectionReport>, HttpAppError> {
    let report = state
        .orchestrator
        .handle(Modality::Text, ContentInput::Text(request.text))
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/api/v1/detections/image",
    tag = "detections",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image analyzed", body = DetectionReport),
        (status = 400, description = "Missing file part", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Not an image", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(modality = "image"))]
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<DetectionReport>, HttpAppError> {
    analyze_upload(&state, Modality::Image, multipart).await
}

#[utoipa::path(
    post,
    path = "/api/v1/detections/video",
    tag = "detections",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video analyzed", body = DetectionReport),
        (status = 400, description = "Missing file part", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Not a video", body = ErrorResponse),
        (status = 502, description = "Video backend unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(modality = "video"))]
pub async fn analyze_video(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<DetectionReport>, HttpAppError> {
    analyze_upload(&state, Modality::Video, multipart).await
}

#[utoipa::path(
    post,
    path = "/api/v1/detections/audio",
    tag = "detections",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Audio analyzed (demo result)", body = DetectionReport),
        (status = 400, description = "Missing file part", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Not audio", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(modality = "audio"))]
pub async fn analyze_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<DetectionReport>, HttpAppError> {
    analyze_upload(&state, Modality::Audio, multipart).await
}

async fn analyze_upload(
    state: &AppState,
    modality: Modality,
    mut multipart: Multipart,
) -> Result<Json<DetectionReport>, HttpAppError> {
    let file = read_file_part(&mut multipart).await?;
    let report = state
        .orchestrator
        .handle(modality, ContentInput::File(file))
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/v1/detections",
    tag = "detections",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Most recent detections, newest first", body = HistoryResponse),
        (status = 503, description = "History store unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_detections(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, HttpAppError> {
    let results = state.orchestrator.list_recent(query.limit).await?;
    Ok(Json(HistoryResponse {
        count: results.len(),
        results,
    }))
}
