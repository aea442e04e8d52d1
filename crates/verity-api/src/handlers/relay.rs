//! Frame-level video relay.
//!
//! Lets this service play the video backend role for another deployment
//! running with `VIDEO_BACKEND=relay`.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;
use verity_analyzers::FrameVerdict;
use verity_core::{ContentInput, ContentValidator, Modality};

use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::upload::read_file_part;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RelayVerdict {
    pub filename: Option<String>,
    pub ai_detected: bool,
    pub confidence: f64,
    pub frames_checked: u32,
    #[schema(value_type = Object)]
    pub raw: JsonValue,
}

impl From<FrameVerdict> for RelayVerdict {
    fn from(verdict: FrameVerdict) -> Self {
        Self {
            filename: verdict.filename,
            ai_detected: verdict.ai_detected,
            confidence: verdict.confidence,
            frames_checked: verdict.frames_checked,
            raw: verdict.raw,
        }
    }
}

#[utoipa::path(
    post,
    path = "/detect-video",
    tag = "relay",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Frame-level verdict", body = RelayVerdict),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "Not a video", body = ErrorResponse),
        (status = 502, description = "Frame backend unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn detect_video(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<RelayVerdict>, HttpAppError> {
    let file = read_file_part(&mut multipart).await?;
    ContentValidator::new(state.config.limits)
        .validate(Modality::Video, &ContentInput::File(file.clone()))?;

    let verdict = state.frame_client.check(&file).await?;

    Ok(Json(verdict.into()))
}
