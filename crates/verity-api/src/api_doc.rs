//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::constants::API_VERSION;
use crate::error;
use crate::handlers;
use verity_core::models;

/// The OpenAPI document served at `/api-docs/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.version = format!("{} ({})", env!("CARGO_PKG_VERSION"), API_VERSION);
    doc
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Verity API",
        description = "Detects AI-generated text, images, video and audio. Every detection is recorded and can be listed newest first. Detection routes are versioned under /api/v1/."
    ),
    paths(
        handlers::detections::analyze_text,
        handlers::detections::analyze_image,
        handlers::detections::analyze_video,
        handlers::detections::analyze_audio,
        handlers::detections::list_detections,
        handlers::relay::detect_video,
    ),
    components(schemas(
        models::Modality,
        models::NewDetectionOutcome,
        models::DetectionOutcome,
        models::DetectionReport,
        models::HistoryEntry,
        handlers::detections::TextDetectionRequest,
        handlers::detections::HistoryResponse,
        handlers::relay::RelayVerdict,
        error::ErrorResponse,
    )),
    tags(
        (name = "detections", description = "AI-content detection by modality and detection history"),
        (name = "relay", description = "Frame-level video detection for other deployments"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_detection_paths() {
        let doc = get_openapi_spec();
        for path in [
            "/api/v1/detections/text",
            "/api/v1/detections/image",
            "/api/v1/detections/video",
            "/api/v1/detections/audio",
            "/api/v1/detections",
            "/detect-video",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
