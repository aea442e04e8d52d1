//! Application setup and initialization
//!
//! Everything main.rs needs before serving: configuration checks, telemetry,
//! the history store, the analyzer roster and the router.

pub mod database;
pub mod routes;
pub mod server;

use crate::services::Orchestrator;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use verity_analyzers::{AnalyzerRegistry, StaticCredentials};
use verity_core::{Config, HistoryBackend};
use verity_db::{create_history_store, HistoryStore};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format)
        .context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment,
        history_backend = ?config.history.backend,
        video_backend = ?config.backends.video_mode,
        "Configuration loaded and validated successfully"
    );

    let pool = match config.history.backend {
        HistoryBackend::Postgres => Some(database::setup_database(&config).await?),
        HistoryBackend::Memory => None,
    };
    let history = create_history_store(&config, pool)?;

    let state = build_state(config, history)?;
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}

/// Wire analyzers and the orchestrator around an existing history store.
pub fn build_state(config: Config, history: Arc<dyn HistoryStore>) -> Result<Arc<AppState>> {
    let credentials = Arc::new(StaticCredentials::from_config(&config.backends));

    let registry = AnalyzerRegistry::from_config(&config.backends, credentials.clone())
        .context("Failed to build analyzers")?;
    let frame_client = AnalyzerRegistry::frame_client(&config.backends, credentials)
        .context("Failed to build video frame client")?;

    for (modality, analyzer) in registry.roster() {
        tracing::info!(modality = %modality, analyzer = %analyzer, "Analyzer registered");
    }

    let orchestrator = Orchestrator::new(&config, Arc::new(registry), history);
    Ok(Arc::new(AppState::new(config, orchestrator, frame_client)))
}
