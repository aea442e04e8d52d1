//! Configuration module
//!
//! Environment-driven configuration for the API: server settings, history
//! store, content limits, analysis backends and per-modality failure policies.

use std::env;
use std::fmt;

use crate::models::{FailurePolicy, Modality};
use crate::validation::{ContentLimits, MIB};

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Where detection history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    Postgres,
    Memory,
}

impl std::str::FromStr for HistoryBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(HistoryBackend::Postgres),
            "memory" => Ok(HistoryBackend::Memory),
            _ => Err(anyhow::anyhow!("Invalid history backend: {}", s)),
        }
    }
}

/// How the video analyzer reaches its backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoBackendMode {
    /// Post the file to a relay that answers with a finished verdict.
    Relay,
    /// Call the frame-level endpoint directly and average per-frame scores.
    Direct,
}

impl std::str::FromStr for VideoBackendMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relay" => Ok(VideoBackendMode::Relay),
            "direct" => Ok(VideoBackendMode::Direct),
            _ => Err(anyhow::anyhow!("Invalid video backend mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Clone, Debug)]
pub struct HistoryConfig {
    pub backend: HistoryBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub default_limit: i64,
    pub max_limit: i64,
}

/// Endpoints and credentials of the analysis backends.
#[derive(Clone)]
pub struct BackendConfig {
    pub text_url: String,
    pub text_api_key: Option<String>,
    pub image_url: String,
    pub image_api_user: Option<String>,
    pub image_api_secret: Option<String>,
    pub image_models: String,
    pub video_mode: VideoBackendMode,
    pub video_url: String,
    pub video_frames_url: String,
    pub timeout_secs: u64,
    pub video_timeout_secs: u64,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "[REDACTED]"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("BackendConfig")
            .field("text_url", &self.text_url)
            .field("text_api_key", &redact(&self.text_api_key))
            .field("image_url", &self.image_url)
            .field("image_api_user", &self.image_api_user)
            .field("image_api_secret", &redact(&self.image_api_secret))
            .field("image_models", &self.image_models)
            .field("video_mode", &self.video_mode)
            .field("video_url", &self.video_url)
            .field("video_frames_url", &self.video_frames_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("video_timeout_secs", &self.video_timeout_secs)
            .finish()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            text_url: "https://api.sapling.ai/api/v1/aidetect".to_string(),
            text_api_key: None,
            image_url: "https://api.sightengine.com/1.0/check.json".to_string(),
            image_api_user: None,
            image_api_secret: None,
            image_models: "genai".to_string(),
            video_mode: VideoBackendMode::Relay,
            video_url: local_relay_url(SERVER_PORT),
            video_frames_url: "https://api.sightengine.com/1.0/video/check-sync.json".to_string(),
            timeout_secs: 30,
            video_timeout_secs: 300,
        }
    }
}

/// Failure policy chosen for each backend-backed modality. Audio has no backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FailurePolicies {
    pub text: FailurePolicy,
    pub image: FailurePolicy,
    pub video: FailurePolicy,
}

impl Default for FailurePolicies {
    fn default() -> Self {
        Self {
            text: FailurePolicy::Fallback,
            image: FailurePolicy::Fallback,
            video: FailurePolicy::Surface,
        }
    }
}

impl FailurePolicies {
    /// `None` means the modality never calls a backend.
    pub fn for_modality(&self, modality: Modality) -> Option<FailurePolicy> {
        match modality {
            Modality::Text => Some(self.text),
            Modality::Image => Some(self.image),
            Modality::Video => Some(self.video),
            Modality::Audio => None,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
    pub history: HistoryConfig,
    pub limits: ContentLimits,
    pub backends: BackendConfig,
    pub failure_policies: FailurePolicies,
    pub store_image_preview: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_IMAGE_SIZE_MB: usize = 10;
        const MAX_VIDEO_SIZE_MB: usize = 100;
        const MAX_AUDIO_SIZE_MB: usize = 50;
        const HISTORY_DEFAULT_LIMIT: i64 = 10;
        const HISTORY_MAX_LIMIT: i64 = 100;

        let defaults = BackendConfig::default();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Compact,
        };

        let history = HistoryConfig {
            backend: env::var("HISTORY_BACKEND")
                .unwrap_or_else(|_| "postgres".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL").ok(),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            default_limit: env::var("HISTORY_DEFAULT_LIMIT")
                .unwrap_or_else(|_| HISTORY_DEFAULT_LIMIT.to_string())
                .parse()
                .unwrap_or(HISTORY_DEFAULT_LIMIT),
            max_limit: env::var("HISTORY_MAX_LIMIT")
                .unwrap_or_else(|_| HISTORY_MAX_LIMIT.to_string())
                .parse()
                .unwrap_or(HISTORY_MAX_LIMIT),
        };

        let limits = ContentLimits {
            image_max_bytes: size_bytes("MAX_IMAGE_SIZE_MB", MAX_IMAGE_SIZE_MB),
            video_max_bytes: size_bytes("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB),
            audio_max_bytes: size_bytes("MAX_AUDIO_SIZE_MB", MAX_AUDIO_SIZE_MB),
        };

        let backends = BackendConfig {
            text_url: env::var("TEXT_BACKEND_URL").unwrap_or(defaults.text_url),
            text_api_key: non_empty_var("TEXT_API_KEY"),
            image_url: env::var("IMAGE_BACKEND_URL").unwrap_or(defaults.image_url),
            image_api_user: non_empty_var("IMAGE_API_USER"),
            image_api_secret: non_empty_var("IMAGE_API_SECRET"),
            image_models: env::var("IMAGE_MODELS").unwrap_or(defaults.image_models),
            video_mode: env::var("VIDEO_BACKEND")
                .unwrap_or_else(|_| "relay".to_string())
                .parse()?,
            video_url: env::var("VIDEO_BACKEND_URL")
                .unwrap_or_else(|_| local_relay_url(server_port)),
            video_frames_url: env::var("VIDEO_FRAMES_BACKEND_URL")
                .unwrap_or(defaults.video_frames_url),
            timeout_secs: env::var("BACKEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.timeout_secs.to_string())
                .parse()
                .unwrap_or(defaults.timeout_secs),
            video_timeout_secs: env::var("VIDEO_BACKEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.video_timeout_secs.to_string())
                .parse()
                .unwrap_or(defaults.video_timeout_secs),
        };

        let failure_policies = FailurePolicies {
            text: env::var("TEXT_FAILURE_POLICY")
                .unwrap_or_else(|_| "fallback".to_string())
                .parse()?,
            image: env::var("IMAGE_FAILURE_POLICY")
                .unwrap_or_else(|_| "fallback".to_string())
                .parse()?,
            video: env::var("VIDEO_FAILURE_POLICY")
                .unwrap_or_else(|_| "surface".to_string())
                .parse()?,
        };

        Ok(Config {
            environment,
            server_port,
            cors_origins,
            log_format,
            history,
            limits,
            backends,
            failure_policies,
            store_image_preview: env::var("STORE_IMAGE_PREVIEW")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        })
    }

    /// Configuration for tests and local development: in-memory history,
    /// default limits and backends.
    pub fn development() -> Self {
        Config {
            environment: "development".to_string(),
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            log_format: LogFormat::Compact,
            history: HistoryConfig {
                backend: HistoryBackend::Memory,
                database_url: None,
                db_max_connections: MAX_CONNECTIONS,
                db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
                default_limit: 10,
                max_limit: 100,
            },
            limits: ContentLimits::default(),
            backends: BackendConfig::default(),
            failure_policies: FailurePolicies::default(),
            store_image_preview: true,
        }
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.history.backend == HistoryBackend::Postgres {
            match self.history.database_url.as_deref() {
                None => {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be set when HISTORY_BACKEND=postgres"
                    ))
                }
                Some(url)
                    if !(url.starts_with("postgresql://") || url.starts_with("postgres://")) =>
                {
                    return Err(anyhow::anyhow!(
                        "DATABASE_URL must be a valid PostgreSQL connection string"
                    ))
                }
                Some(_) => {}
            }
        }

        if self.failure_policies.text != FailurePolicy::Fallback
            || self.failure_policies.image != FailurePolicy::Fallback
        {
            return Err(anyhow::anyhow!(
                "TEXT_FAILURE_POLICY and IMAGE_FAILURE_POLICY only support 'fallback'"
            ));
        }

        if self.history.default_limit < 1 || self.history.max_limit < self.history.default_limit
        {
            return Err(anyhow::anyhow!(
                "HISTORY_DEFAULT_LIMIT must be at least 1 and not exceed HISTORY_MAX_LIMIT"
            ));
        }

        if self.limits.image_max_bytes == 0
            || self.limits.video_max_bytes == 0
            || self.limits.audio_max_bytes == 0
        {
            return Err(anyhow::anyhow!("Maximum content sizes must be greater than zero"));
        }

        if self.limits.request_body_limit().is_none() {
            return Err(anyhow::anyhow!(
                "Maximum content sizes are too large; lower MAX_IMAGE_SIZE_MB, MAX_VIDEO_SIZE_MB or MAX_AUDIO_SIZE_MB"
            ));
        }

        if self.backends.timeout_secs == 0 || self.backends.video_timeout_secs == 0 {
            return Err(anyhow::anyhow!("Backend timeouts must be greater than zero"));
        }

        Ok(())
    }
}

/// This service's own `/detect-video` relay, the default relay-mode target.
fn local_relay_url(port: u16) -> String {
    format!("http://localhost:{}/detect-video", port)
}

/// Megabyte setting converted to bytes. Saturates on overflow so `validate`
/// can reject it.
fn size_bytes(key: &str, default_mb: usize) -> usize {
    env::var(key)
        .unwrap_or_else(|_| default_mb.to_string())
        .parse::<usize>()
        .unwrap_or(default_mb)
        .checked_mul(MIB)
        .unwrap_or(usize::MAX)
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
