use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of content submitted for detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "content_modality", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Text,
    Image,
    Video,
    Audio,
}

impl Modality {
    pub const ALL: [Modality; 4] = [
        Modality::Text,
        Modality::Image,
        Modality::Video,
        Modality::Audio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Image => "image",
            Modality::Video => "video",
            Modality::Audio => "audio",
        }
    }

    /// MIME prefix a file of this modality must declare. `None` for text.
    pub fn mime_prefix(&self) -> Option<&'static str> {
        match self {
            Modality::Text => None,
            Modality::Image => Some("image/"),
            Modality::Video => Some("video/"),
            Modality::Audio => Some("audio/"),
        }
    }

    pub fn is_file(&self) -> bool {
        !matches!(self, Modality::Text)
    }
}

impl FromStr for Modality {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Modality::Text),
            "image" => Ok(Modality::Image),
            "video" => Ok(Modality::Video),
            "audio" => Ok(Modality::Audio),
            _ => Err(anyhow::anyhow!("Invalid modality: {}", s)),
        }
    }
}

impl Display for Modality {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// What happens when a modality's backend call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Substitute a labeled synthetic result.
    Fallback,
    /// Report the failure to the caller.
    Surface,
}

impl FromStr for FailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fallback" => Ok(FailurePolicy::Fallback),
            "surface" => Ok(FailurePolicy::Surface),
            _ => Err(anyhow::anyhow!("Invalid failure policy: {}", s)),
        }
    }
}

impl Display for FailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FailurePolicy::Fallback => write!(f, "fallback"),
            FailurePolicy::Surface => write!(f, "surface"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modality_parse_is_case_insensitive() {
        assert_eq!("IMAGE".parse::<Modality>().unwrap(), Modality::Image);
        assert_eq!(" audio ".parse::<Modality>().unwrap(), Modality::Audio);
        assert!("document".parse::<Modality>().is_err());
    }

    #[test]
    fn test_modality_serializes_lowercase() {
        let json = serde_json::to_string(&Modality::Video).unwrap();
        assert_eq!(json, "\"video\"");
    }

    #[test]
    fn test_mime_prefix() {
        assert_eq!(Modality::Text.mime_prefix(), None);
        assert_eq!(Modality::Audio.mime_prefix(), Some("audio/"));
        assert!(!Modality::Text.is_file());
        assert!(Modality::Image.is_file());
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!(
            "Surface".parse::<FailurePolicy>().unwrap(),
            FailurePolicy::Surface
        );
        assert!("retry".parse::<FailurePolicy>().is_err());
    }
}
