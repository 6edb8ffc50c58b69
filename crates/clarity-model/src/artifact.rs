//! Generated marketing artifacts
//!
//! Provides:
//! - [`ArtifactKind`]: the artifact types that can be generated per idea
//! - [`ArtifactContent`]: plain text or structured JSON payloads
//! - [`Provenance`]: which backend produced a payload, or the fallback marker
//! - [`GeneratedArtifact`]: one persisted generation result

use crate::error::ModelError;
use crate::ids::{IdeaId, RecordId, UserId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Artifact type, one cache slot per idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Short social post asking for feedback
    Tweet,
    /// JSON array of competing products
    Competitors,
    /// Prompt for AI landing-page builders
    LandingPage,
    /// JSON market-validation survey
    Survey,
}

impl ArtifactKind {
    /// Every kind
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Tweet,
        ArtifactKind::Competitors,
        ArtifactKind::LandingPage,
        ArtifactKind::Survey,
    ];

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Tweet => "tweet",
            ArtifactKind::Competitors => "competitors",
            ArtifactKind::LandingPage => "landing_page",
            ArtifactKind::Survey => "survey",
        }
    }

    /// Response field carrying the content
    #[inline]
    #[must_use]
    pub fn response_field(&self) -> &'static str {
        match self {
            ArtifactKind::Tweet => "tweet",
            ArtifactKind::Competitors => "competitors",
            ArtifactKind::LandingPage => "prompt",
            ArtifactKind::Survey => "survey",
        }
    }

    /// Whether generated text must parse as JSON
    #[inline]
    #[must_use]
    pub fn is_structured(&self) -> bool {
        matches!(self, ArtifactKind::Competitors | ArtifactKind::Survey)
    }
}

impl FromStr for ArtifactKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModelError::InvalidArtifactKind {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of a generated artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactContent {
    /// Free text (tweets, landing-page prompts)
    Text(String),
    /// Structured output (competitor lists, surveys)
    Json(serde_json::Value),
}

impl ArtifactContent {
    /// Text payload, if any
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArtifactContent::Text(text) => Some(text),
            ArtifactContent::Json(_) => None,
        }
    }

    /// JSON payload, if any
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ArtifactContent::Json(value) => Some(value),
            ArtifactContent::Text(_) => None,
        }
    }

    /// Convert to a JSON value for response payloads
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            ArtifactContent::Text(text) => serde_json::Value::String(text.clone()),
            ArtifactContent::Json(value) => value.clone(),
        }
    }
}

/// Marker stored for canned substitute content
pub const FALLBACK_TAG: &str = "mock-fallback";

/// Which backend produced an artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provenance {
    /// A generation backend, tagged by model name
    Backend(String),
    /// Canned content substituted when the backend was out of quota
    Fallback,
}

impl Provenance {
    /// Create backend provenance
    #[inline]
    pub fn backend(tag: impl Into<String>) -> Self {
        Self::Backend(tag.into())
    }

    /// Whether this is substitute content
    #[inline]
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Provenance::Fallback)
    }

    /// Stored tag
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Provenance::Backend(tag) => tag,
            Provenance::Fallback => FALLBACK_TAG,
        }
    }
}

impl From<String> for Provenance {
    fn from(value: String) -> Self {
        if value == FALLBACK_TAG {
            Provenance::Fallback
        } else {
            Provenance::Backend(value)
        }
    }
}

impl From<Provenance> for String {
    fn from(value: Provenance) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One persisted generation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// Record identifier
    pub id: RecordId,
    /// Idea the artifact was generated for
    pub idea_id: IdeaId,
    /// Artifact kind
    pub kind: ArtifactKind,
    /// User whose request produced it
    pub requested_by: UserId,
    /// Artifact payload
    pub content: ArtifactContent,
    /// Start of its freshness window
    pub generated_at: Timestamp,
    /// Backend tag or fallback marker
    pub provenance: Provenance,
}

impl GeneratedArtifact {
    /// Create artifact generated at `now`
    #[must_use]
    pub fn new(
        idea_id: IdeaId,
        kind: ArtifactKind,
        requested_by: UserId,
        content: ArtifactContent,
        provenance: Provenance,
        now: Timestamp,
    ) -> Self {
        Self {
            id: RecordId::new(),
            idea_id,
            kind,
            requested_by,
            content,
            generated_at: now,
            provenance,
        }
    }

    /// Age relative to `now` (negative if generated in the future)
    #[inline]
    #[must_use]
    pub fn age(&self, now: Timestamp) -> chrono::Duration {
        now - self.generated_at
    }
}
