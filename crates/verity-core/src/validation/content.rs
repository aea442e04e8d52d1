//! Per-modality content constraints.
//!
//! Checks run before any backend call: the declared MIME type must match the
//! modality, files must fit under the modality's size ceiling and text must
//! contain something other than whitespace.

use crate::models::{ContentInput, Modality};

pub const MIB: usize = 1024 * 1024;

/// Extra room over the largest file ceiling for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: usize = MIB;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid content type for {modality}: {actual} (expected {expected})")]
    InvalidType {
        modality: Modality,
        expected: String,
        actual: String,
    },

    #[error("{modality} file too large: {size} bytes (max: {max} bytes)")]
    TooLarge {
        modality: Modality,
        size: usize,
        max: usize,
    },

    #[error("Text content is empty")]
    Empty,
}

impl ValidationError {
    /// Machine-readable rejection code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidType { .. } => "INVALID_TYPE",
            ValidationError::TooLarge { .. } => "TOO_LARGE",
            ValidationError::Empty => "EMPTY_CONTENT",
        }
    }
}

/// Size ceilings per file modality, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLimits {
    pub image_max_bytes: usize,
    pub video_max_bytes: usize,
    pub audio_max_bytes: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            image_max_bytes: 10 * MIB,
            video_max_bytes: 100 * MIB,
            audio_max_bytes: 50 * MIB,
        }
    }
}

impl ContentLimits {
    pub fn max_for(&self, modality: Modality) -> Option<usize> {
        match modality {
            Modality::Text => None,
            Modality::Image => Some(self.image_max_bytes),
            Modality::Video => Some(self.video_max_bytes),
            Modality::Audio => Some(self.audio_max_bytes),
        }
    }

    /// Largest ceiling across modalities, used to size request body limits.
    pub fn largest(&self) -> usize {
        self.image_max_bytes
            .max(self.video_max_bytes)
            .max(self.audio_max_bytes)
    }

    /// Request body limit for uploads: the largest ceiling plus multipart
    /// overhead. `None` when that does not fit in `usize`.
    pub fn request_body_limit(&self) -> Option<usize> {
        self.largest().checked_add(MULTIPART_OVERHEAD_BYTES)
    }
}

/// Content validator
///
/// Pure checks with no side effects. Zero-byte files are accepted; the
/// backends decide what to make of them.
#[derive(Debug, Clone, Default)]
pub struct ContentValidator {
    limits: ContentLimits,
}

impl ContentValidator {
    pub fn new(limits: ContentLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ContentLimits {
        &self.limits
    }

    pub fn validate(&self, modality: Modality, input: &ContentInput) -> Result<(), ValidationError> {
        match (modality.mime_prefix(), input) {
            (None, ContentInput::Text(text)) => {
                if text.trim().is_empty() {
                    return Err(ValidationError::Empty);
                }
                Ok(())
            }
            (None, ContentInput::File(file)) => Err(ValidationError::InvalidType {
                modality,
                expected: "text".to_string(),
                actual: file.mime_type.clone(),
            }),
            (Some(prefix), ContentInput::Text(_)) => Err(ValidationError::InvalidType {
                modality,
                expected: format!("{}*", prefix),
                actual: "text".to_string(),
            }),
            (Some(prefix), ContentInput::File(file)) => {
                let normalized = file.mime_type.trim().to_lowercase();
                if !normalized.starts_with(prefix) {
                    return Err(ValidationError::InvalidType {
                        modality,
                        expected: format!("{}*", prefix),
                        actual: file.mime_type.clone(),
                    });
                }

                if let Some(max) = self.limits.max_for(modality) {
                    if file.size() > max {
                        return Err(ValidationError::TooLarge {
                            modality,
                            size: file.size(),
                            max,
                        });
                    }
                }

                Ok(())
            }
        }
    }
}
