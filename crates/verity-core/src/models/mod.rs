//! Data models for the application
//!
//! Each sub-module covers one stage of a detection: the submitted content, the
//! raw analyzer result and the normalized, persisted outcome.

mod content;
mod detection;
mod modality;
mod raw;

pub use content::*;
pub use detection::*;
pub use modality::*;
pub use raw::*;
