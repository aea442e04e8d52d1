//! Analyzer abstraction
//!
//! An analyzer owns one modality and knows how to obtain a raw verdict for it.
//! Failures are split into transport failures (the backend could not be
//! reached in time) and protocol failures (it answered, but not with a usable
//! verdict, or the call could not be made as configured).

use async_trait::async_trait;
use std::fmt::Debug;
use verity_core::models::{ContentInput, Modality, RawResult};

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("{backend} request failed: {message}")]
    Transport { backend: String, message: String },

    #[error("{backend} returned an unusable response: {message}")]
    Protocol { backend: String, message: String },

    #[error("{backend} is not configured: {credential} is missing")]
    NotConfigured {
        backend: String,
        credential: &'static str,
    },
}

impl AnalyzerError {
    pub fn transport(backend: impl Into<String>, message: impl Into<String>) -> Self {
        AnalyzerError::Transport {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn protocol(backend: impl Into<String>, message: impl Into<String>) -> Self {
        AnalyzerError::Protocol {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Classify a reqwest failure. Body decoding problems are protocol errors,
    /// everything else means the backend was not reached.
    pub fn from_reqwest(backend: &str, err: reqwest::Error) -> Self {
        if err.is_decode() || err.is_body() {
            AnalyzerError::protocol(backend, err.to_string())
        } else if err.is_timeout() {
            AnalyzerError::transport(backend, format!("timed out: {}", err))
        } else {
            AnalyzerError::transport(backend, err.to_string())
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AnalyzerError::Transport { .. })
    }

    /// Short label used in logs and result details.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzerError::Transport { .. } => "transport",
            AnalyzerError::Protocol { .. } => "protocol",
            AnalyzerError::NotConfigured { .. } => "not_configured",
        }
    }
}

/// Trait that all analyzers must implement
#[async_trait]
pub trait Analyzer: Send + Sync + Debug {
    /// Backend name recorded as the analysis method.
    fn name(&self) -> &str;

    /// Modality this analyzer handles.
    fn modality(&self) -> Modality;

    /// Whether `analyze` performs network I/O.
    fn uses_backend(&self) -> bool {
        true
    }

    async fn analyze(&self, content: &ContentInput) -> Result<RawResult, AnalyzerError>;
}
