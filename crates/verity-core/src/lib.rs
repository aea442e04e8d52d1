//! Verity Core Library
//!
//! This crate provides the domain models, error types, configuration, content
//! validation and result normalization shared across all Verity components.

pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod validation;

// Re-export commonly used types
pub use config::{
    BackendConfig, Config, FailurePolicies, HistoryBackend, HistoryConfig, LogFormat,
    VideoBackendMode,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    AnalysisMethod, ContentInput, DetectionOutcome, DetectionReport, FailurePolicy, FileInput,
    HistoryEntry, Modality, NewDetectionOutcome, RawPayload, RawResult, StoredOutcome,
};
pub use normalize::{ContentSubject, ResultNormalizer};
pub use validation::{ContentLimits, ContentValidator, ValidationError};
