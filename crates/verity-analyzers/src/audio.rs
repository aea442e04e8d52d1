//! Placeholder audio analyzer.
//!
//! There is no audio detection backend yet. Every call returns a demo result
//! with a confidence drawn from [0.3, 0.7] and `is_ai = false`.

use async_trait::async_trait;
use rand::Rng;
use verity_core::models::{ContentInput, Modality, RawResult};

use crate::analyzer::{Analyzer, AnalyzerError};

pub const AUDIO_DEMO_CONFIDENCE_MIN: f64 = 0.3;
pub const AUDIO_DEMO_CONFIDENCE_MAX: f64 = 0.7;

#[derive(Debug, Default)]
pub struct AudioAnalyzer;

impl AudioAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize_with<R: Rng + ?Sized>(rng: &mut R) -> RawResult {
        RawResult::demo(rng.random_range(AUDIO_DEMO_CONFIDENCE_MIN..=AUDIO_DEMO_CONFIDENCE_MAX))
    }
}

#[async_trait]
impl Analyzer for AudioAnalyzer {
    fn name(&self) -> &str {
        "audio-demo"
    }

    fn modality(&self) -> Modality {
        Modality::Audio
    }

    fn uses_backend(&self) -> bool {
        false
    }

    async fn analyze(&self, _content: &ContentInput) -> Result<RawResult, AnalyzerError> {
        let raw = Self::synthesize_with(&mut rand::rng());
        tracing::debug!("Audio analysis returned placeholder result");
        Ok(raw)
    }
}
