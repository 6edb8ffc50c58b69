//! Boundary request and response shapes
//!
//! Requests carry raw strings exactly as received; [`ClarityService`](crate::ClarityService)
//! validates them. Responses serialize to the JSON bodies clients consume.

use crate::artifacts::ArtifactResponse;
use crate::challenge::ChallengeView;
use crate::progress::ProgressSnapshot;
use crate::roadmap::{RoadmapChange, RoadmapSummary};
use crate::saved::SavedIdeaView;
use clarity_model::{ArtifactContent, ArtifactKind, PublicIdea, RecordId, RoadmapItem, Timestamp};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Mark a validation step completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkStepRequest {
    /// Idea being validated
    pub idea_id: String,
    /// Step name, for example `landing`
    pub step: String,
}

/// Any request addressing a single idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRequest {
    /// Idea identifier as a UUID string
    pub idea_id: String,
}

/// Upsert a roadmap step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapUpdateRequest {
    /// Idea the roadmap belongs to
    pub idea_id: String,
    /// Free-form step name, unique per idea
    pub step_name: String,
    /// Desired completion state
    #[serde(default)]
    pub completed: bool,
    /// Replaces stored notes when present
    #[serde(default)]
    pub notes: Option<String>,
    /// Replaces stored link when present
    #[serde(default)]
    pub link: Option<String>,
}

impl RoadmapUpdateRequest {
    pub(crate) fn change(&self) -> RoadmapChange {
        RoadmapChange {
            step_name: self.step_name.clone(),
            completed: self.completed,
            notes: self.notes.clone(),
            link: self.link.clone(),
        }
    }
}

/// Step written, with the resulting progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkStepResponse {
    /// Always `true` on success
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Progress after the write
    pub progress: ProgressSnapshot,
}

/// Progress of one idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// Current progress
    pub progress: ProgressSnapshot,
}

/// `success` is `false` when the challenge already existed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeStartResponse {
    /// `false` when a challenge already existed
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Current view of the challenge
    pub challenge: ChallengeView,
}

/// Challenge state, or a message when none was started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeStatusResponse {
    /// Whether a challenge exists
    pub challenge_started: bool,
    /// Present once started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge: Option<ChallengeView>,
    /// Present only when not started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Generic acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Always `true` on success
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

/// A roadmap item as clients see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapItemView {
    /// Record identifier
    pub id: RecordId,
    /// Step name
    pub step_name: String,
    /// Whether completed
    pub completed: bool,
    /// Set while completed
    pub completed_at: Option<Timestamp>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Evidence URL
    pub link: Option<String>,
    /// Creation time
    pub created_at: Timestamp,
    /// Last write
    pub updated_at: Timestamp,
}

impl From<RoadmapItem> for RoadmapItemView {
    fn from(item: RoadmapItem) -> Self {
        Self {
            id: item.id,
            completed: item.is_completed(),
            completed_at: item.completed_at(),
            step_name: item.key.step_name,
            notes: item.notes,
            link: item.link,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

/// Roadmap of one idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapResponse {
    /// Items in creation order
    pub roadmap: Vec<RoadmapItemView>,
    /// Aggregate counts
    pub summary: RoadmapSummary,
}

/// Generated artifact body
///
/// The content goes under a kind-specific field (`tweet`, `competitors`,
/// `prompt` or `survey`); `mock` and `message` appear only for fallback content.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    /// Selects the content field name
    pub kind: ArtifactKind,
    /// Generated or fallback content
    pub content: ArtifactContent,
    /// Served from the log
    pub cached: bool,
    /// Content is canned fallback
    pub mock: bool,
    /// Explanation attached to fallback content
    pub message: Option<String>,
}

impl From<ArtifactResponse> for GenerationResponse {
    fn from(response: ArtifactResponse) -> Self {
        Self {
            kind: response.kind,
            content: response.content,
            cached: response.cached,
            mock: response.mock,
            message: response.message,
        }
    }
}

impl Serialize for GenerationResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 2 + usize::from(self.mock) + usize::from(self.message.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(self.kind.response_field(), &self.content)?;
        map.serialize_entry("cached", &self.cached)?;
        if self.mock {
            map.serialize_entry("mock", &true)?;
        }
        if let Some(message) = &self.message {
            map.serialize_entry("message", message)?;
        }
        map.end()
    }
}

/// Outcome of saving an idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveIdeaResponse {
    /// Always `true` on success
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// `false` when the idea was already saved
    pub saved: bool,
}

/// Outcome of removing a bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsaveIdeaResponse {
    /// Always `true` on success
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// `false` when no bookmark existed
    pub removed: bool,
}

/// A user's saved ideas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedIdeasResponse {
    /// Most recently saved first
    pub ideas: Vec<SavedIdeaView>,
    /// Number of ideas
    pub count: usize,
}

/// Public ideas ranked by demand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaWallResponse {
    /// Highest demand first
    pub ideas: Vec<PublicIdea>,
    /// Number of ideas
    pub count: usize,
}
