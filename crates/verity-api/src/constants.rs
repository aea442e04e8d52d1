//! API constants
//!
//! Detection routes are versioned under `API_PREFIX`. The relay endpoint and
//! the health probes live outside it.

pub const API_VERSION: &str = "v1";

/// Versioned prefix for detection routes, e.g. `/api/v1`.
pub const API_PREFIX: &str = "/api/v1";

/// Path of the frame-level video relay.
pub const VIDEO_RELAY_PATH: &str = "/detect-video";

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
