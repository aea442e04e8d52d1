//! Verity API Library
//!
//! HTTP handlers, the detection orchestrator and application setup.

mod api_doc;
pub mod constants;
pub mod error;
mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::{ErrorResponse, HttpAppError};
pub use services::Orchestrator;
pub use state::AppState;
