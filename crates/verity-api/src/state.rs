//! Application state shared by all handlers.

use std::sync::Arc;
use verity_analyzers::VideoFrameClient;
use verity_core::Config;

use crate::services::Orchestrator;

pub struct AppState {
    pub config: Config,
    pub orchestrator: Orchestrator,
    /// Backs the `/detect-video` relay.
    pub frame_client: Arc<VideoFrameClient>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Orchestrator, frame_client: VideoFrameClient) -> Self {
        Self {
            config,
            orchestrator,
            frame_client: Arc::new(frame_client),
        }
    }
}
