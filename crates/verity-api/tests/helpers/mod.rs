//! Test helpers: build AppState and router for integration tests.
//!
//! Backends are mockito servers and history lives in memory, so these tests
//! need neither network access nor a database.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::Arc;
use verity_api::constants;
use verity_api::setup::{build_state, routes};
use verity_core::{AppError, Config, DetectionOutcome, NewDetectionOutcome, StoredOutcome};
use verity_db::{HistoryStore, InMemoryHistoryStore};

/// API path prefix for tests (e.g. `/api/v1/detections`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Development config with every backend pointed at `backend_url`.
///
/// Paths: `/text`, `/image`, `/video` (relay) and `/frames`.
pub fn test_config(backend_url: &str) -> Config {
    let mut config = Config::development();
    config.backends.text_url = format!("{}/text", backend_url);
    config.backends.text_api_key = Some("test-text-key".to_string());
    config.backends.image_url = format!("{}/image", backend_url);
    config.backends.image_api_user = Some("test-user".to_string());
    config.backends.image_api_secret = Some("test-secret".to_string());
    config.backends.video_url = format!("{}/video", backend_url);
    config.backends.video_frames_url = format!("{}/frames", backend_url);
    config.backends.timeout_secs = 5;
    config.backends.video_timeout_secs = 5;
    config
}

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<InMemoryHistoryStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// App backed by an in-memory history store.
pub fn setup_test_app(config: Config) -> TestApp {
    let store = Arc::new(InMemoryHistoryStore::new());
    let server = server_with_store(config, store.clone());
    TestApp { server, store }
}

pub fn server_with_store(config: Config, store: Arc<dyn HistoryStore>) -> TestServer {
    let state = build_state(config, store).expect("Failed to build app state");
    let router =
        routes::setup_routes(&state.config, state.clone()).expect("Failed to build routes");
    TestServer::new(router).expect("Failed to start test server")
}

/// History store whose every call fails, as an unreachable database would.
#[derive(Debug)]
pub struct UnreachableStore;

#[async_trait]
impl HistoryStore for UnreachableStore {
    async fn record(&self, _outcome: &NewDetectionOutcome) -> Result<StoredOutcome, AppError> {
        Err(AppError::Persistence("connection refused".to_string()))
    }

    async fn recent(&self, _limit: i64) -> Result<Vec<DetectionOutcome>, AppError> {
        Err(AppError::Persistence("connection refused".to_string()))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::Persistence("connection refused".to_string()))
    }

    fn backend_name(&self) -> &'static str {
        "unreachable"
    }
}
