//! Route configuration and setup.
//!
//! Detection routes live under `API_PREFIX`; health checks in [health](health).

mod health;

use crate::constants::{API_PREFIX, OPENAPI_JSON_PATH, VIDEO_RELAY_PATH};
use crate::handlers::{detections, relay};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;
use verity_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = config
        .limits
        .request_body_limit()
        .ok_or_else(|| anyhow::anyhow!("Maximum content sizes overflow the request body limit"))?;
    tracing::info!(body_limit_bytes = body_limit, "Request body limit layer enabled");

    let app = detection_routes()
        .merge(public_routes())
        .with_state(state)
        .route(
            OPENAPI_JSON_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/docs"))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn detection_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/detections/text", API_PREFIX),
            post(detections::analyze_text),
        )
        .route(
            &format!("{}/detections/image", API_PREFIX),
            post(detections::analyze_image),
        )
        .route(
            &format!("{}/detections/video", API_PREFIX),
            post(detections::analyze_video),
        )
        .route(
            &format!("{}/detections/audio", API_PREFIX),
            post(detections::analyze_audio),
        )
        .route(
            &format!("{}/detections", API_PREFIX),
            get(detections::list_detections),
        )
        .route(VIDEO_RELAY_PATH, post(relay::detect_video))
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route("/ready", get(health::readiness_check))
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_rejects_malformed_origin() {
        let mut config = Config::development();
        config.cors_origins = vec!["https://ok.example".into(), "bad\norigin".into()];
        assert!(setup_cors(&config).is_err());
    }

    #[test]
    fn test_cors_accepts_listed_origins() {
        let mut config = Config::development();
        config.cors_origins = vec!["https://app.example".into()];
        assert!(setup_cors(&config).is_ok());
    }
}
