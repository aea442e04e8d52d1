//! Analyzer registry keyed by modality

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use verity_core::models::Modality;
use verity_core::{BackendConfig, VideoBackendMode};

use crate::analyzer::Analyzer;
use crate::audio::AudioAnalyzer;
use crate::credentials::CredentialProvider;
use crate::image::ImageAnalyzer;
use crate::text::TextAnalyzer;
use crate::video::VideoAnalyzer;
use crate::video_frames::VideoFrameClient;

/// Registry of analyzers, one per modality.
///
/// Built once at startup and never mutated afterwards, so lookups need no
/// locking.
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    analyzers: HashMap<Modality, Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an analyzer, replacing any previous one for the same modality.
    pub fn with(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzers.insert(analyzer.modality(), analyzer);
        self
    }

    /// Build the standard roster from backend configuration.
    pub fn from_config(
        config: &BackendConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let video_timeout = Duration::from_secs(config.video_timeout_secs);

        let text = TextAnalyzer::new(config.text_url.clone(), timeout, credentials.clone())?;
        let image = ImageAnalyzer::new(
            config.image_url.clone(),
            config.image_models.clone(),
            timeout,
            credentials.clone(),
        )?;
        let video = match config.video_mode {
            VideoBackendMode::Relay => VideoAnalyzer::relay(config.video_url.clone(), video_timeout)?,
            VideoBackendMode::Direct => VideoAnalyzer::direct(Self::frame_client(config, credentials)?),
        };

        Ok(Self::new()
            .with(Arc::new(text))
            .with(Arc::new(image))
            .with(Arc::new(video))
            .with(Arc::new(AudioAnalyzer::new())))
    }

    /// Frame-level client shared by direct video mode and the relay endpoint.
    pub fn frame_client(
        config: &BackendConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<VideoFrameClient> {
        VideoFrameClient::new(
            config.video_frames_url.clone(),
            config.image_models.clone(),
            Duration::from_secs(config.video_timeout_secs),
            credentials,
        )
    }

    pub fn get(&self, modality: Modality) -> Result<Arc<dyn Analyzer>> {
        self.analyzers
            .get(&modality)
            .cloned()
            .with_context(|| format!("No analyzer registered for {}", modality))
    }

    pub fn contains(&self, modality: Modality) -> bool {
        self.analyzers.contains_key(&modality)
    }

    /// (modality, analyzer name) pairs in modality order.
    pub fn roster(&self) -> Vec<(Modality, String)> {
        Modality::ALL
            .iter()
            .filter_map(|m| {
                self.analyzers
                    .get(m)
                    .map(|analyzer| (*m, analyzer.name().to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalyzerError;
    use crate::credentials::StaticCredentials;
    use async_trait::async_trait;
    use verity_core::models::{ContentInput, RawResult};

    #[derive(Debug)]
    struct MockAnalyzer {
        name: String,
        modality: Modality,
    }

    #[async_trait]
    impl Analyzer for MockAnalyzer {
        fn name(&self) -> &str {
            &self.name
        }

        fn modality(&self) -> Modality {
            self.modality
        }

        async fn analyze(&self, _content: &ContentInput) -> Result<RawResult, AnalyzerError> {
            Ok(RawResult::demo(0.5))
        }
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = AnalyzerRegistry::new();
        assert!(registry.roster().is_empty());
        assert!(registry.get(Modality::Text).is_err());
    }

    #[test]
    fn test_with_replaces_same_modality() {
        let registry = AnalyzerRegistry::new()
            .with(Arc::new(MockAnalyzer {
                name: "first".into(),
                modality: Modality::Text,
            }))
            .with(Arc::new(MockAnalyzer {
                name: "second".into(),
                modality: Modality::Text,
            }));

        assert_eq!(registry.get(Modality::Text).unwrap().name(), "second");
        assert_eq!(registry.roster().len(), 1);
    }

    #[test]
    fn test_from_config_registers_every_modality() {
        let registry = AnalyzerRegistry::from_config(
            &BackendConfig::default(),
            Arc::new(StaticCredentials::new()),
        )
        .unwrap();

        let roster = registry.roster();
        assert_eq!(
            roster,
            vec![
                (Modality::Text, "sapling".to_string()),
                (Modality::Image, "sightengine".to_string()),
                (Modality::Video, "video-relay".to_string()),
                (Modality::Audio, "audio-demo".to_string()),
            ]
        );
    }

    #[test]
    fn test_direct_video_mode() {
        let config = BackendConfig {
            video_mode: VideoBackendMode::Direct,
            ..BackendConfig::default()
        };
        let registry =
            AnalyzerRegistry::from_config(&config, Arc::new(StaticCredentials::new())).unwrap();
        assert_eq!(
            registry.get(Modality::Video).unwrap().name(),
            "sightengine-video"
        );
    }
}
