//! Verity analyzers
//!
//! One analyzer per modality, each turning submitted content into a raw
//! verdict from an external detection service (or, for audio, a placeholder).
//! `FallbackPolicy` wraps analyzer calls and substitutes a labeled synthetic
//! result when a backend cannot be reached. `AnalyzerRegistry` dispatches on
//! `Modality`.

pub mod analyzer;
pub mod audio;
pub mod credentials;
pub mod fallback;
mod http;
pub mod image;
pub mod registry;
pub mod text;
pub mod video;
pub mod video_frames;

pub use analyzer::{Analyzer, AnalyzerError};
pub use audio::AudioAnalyzer;
pub use credentials::{CredentialKey, CredentialProvider, Secret, StaticCredentials};
pub use fallback::{FallbackPolicy, PolicyOutcome};
pub use image::ImageAnalyzer;
pub use registry::AnalyzerRegistry;
pub use text::TextAnalyzer;
pub use video::VideoAnalyzer;
pub use video_frames::{FrameVerdict, VideoFrameClient};
