//! Validation modules

pub mod content;

pub use content::{ContentLimits, ContentValidator, ValidationError, MIB, MULTIPART_OVERHEAD_BYTES};
