//! Store contracts
//!
//! One trait per entity. Each store is the arbiter of its own unique key:
//! `insert` must fail with [`StoreError::Conflict`](crate::StoreError::Conflict)
//! rather than create a second row for the same key.

use crate::error::StoreResult;
use async_trait::async_trait;
use clarity_model::{
    ArtifactKind, Challenge, ChallengeKey, GeneratedArtifact, IdeaId, ProgressKey, ProgressRecord,
    RecordId, RoadmapItem, RoadmapKey, SavedIdea, SavedIdeaKey, Timestamp, UserId,
};

/// Field changes accepted by [`ProgressStore::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// Set `completed = true, completed_at = at` unless already completed
    MarkCompleted {
        /// Completion time
        at: Timestamp,
    },
}

/// Field changes accepted by [`ChallengeStore::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeUpdate {
    /// Compare-and-set `completed_at` from null to `at`
    ///
    /// Stores must answer `Conflict` when `completed_at` is already set.
    Complete {
        /// Completion time
        at: Timestamp,
    },
}

/// Field changes accepted by [`RoadmapStore::update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapUpdate {
    /// Desired completion state
    pub completed: bool,
    /// Replaces stored notes when present
    pub notes: Option<String>,
    /// Replaces stored link when present
    pub link: Option<String>,
    /// Write time, also the completion time
    pub at: Timestamp,
}

/// (user, idea, step) → completion record
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Point lookup by unique key
    async fn find(&self, key: &ProgressKey) -> StoreResult<Option<ProgressRecord>>;

    /// Every record for a (user, idea) pair
    async fn list(&self, user_id: &UserId, idea_id: &IdeaId) -> StoreResult<Vec<ProgressRecord>>;

    /// Create a record; `Conflict` if the key exists
    async fn insert(&self, record: ProgressRecord) -> StoreResult<ProgressRecord>;

    /// Apply a change to an existing record
    async fn update(&self, id: RecordId, update: ProgressUpdate) -> StoreResult<ProgressRecord>;
}

/// (user, idea) → challenge
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Point lookup by unique key
    async fn find(&self, key: &ChallengeKey) -> StoreResult<Option<Challenge>>;

    /// Create a challenge; `Conflict` if the key exists
    async fn insert(&self, challenge: Challenge) -> StoreResult<Challenge>;

    /// Apply a change to an existing challenge
    async fn update(&self, id: RecordId, update: ChallengeUpdate) -> StoreResult<Challenge>;
}

/// (user, idea, step_name) → roadmap item
#[async_trait]
pub trait RoadmapStore: Send + Sync {
    /// Point lookup by unique key
    async fn find(&self, key: &RoadmapKey) -> StoreResult<Option<RoadmapItem>>;

    /// Items for a (user, idea) pair ordered by `created_at` ascending
    async fn list(&self, user_id: &UserId, idea_id: &IdeaId) -> StoreResult<Vec<RoadmapItem>>;

    /// Create an item; `Conflict` if the key exists
    async fn insert(&self, item: RoadmapItem) -> StoreResult<RoadmapItem>;

    /// Overwrite the mutable fields of an existing item
    async fn update(&self, id: RecordId, update: RoadmapUpdate) -> StoreResult<RoadmapItem>;
}

/// Append-only log of generated artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Most recently generated artifact for (idea, kind)
    async fn latest(&self, idea_id: &IdeaId, kind: ArtifactKind)
        -> StoreResult<Option<GeneratedArtifact>>;

    /// Append an artifact
    async fn insert(&self, artifact: GeneratedArtifact) -> StoreResult<GeneratedArtifact>;
}

/// (user, idea) → bookmark
#[async_trait]
pub trait SavedIdeaStore: Send + Sync {
    /// Point lookup by unique key
    async fn find(&self, key: &SavedIdeaKey) -> StoreResult<Option<SavedIdea>>;

    /// Create a bookmark; `Conflict` if the key exists
    async fn insert(&self, saved: SavedIdea) -> StoreResult<SavedIdea>;

    /// Bookmarks of a user, newest first
    async fn list(&self, user_id: &UserId) -> StoreResult<Vec<SavedIdea>>;

    /// Remove a bookmark; returns whether one existed
    async fn delete(&self, key: &SavedIdeaKey) -> StoreResult<bool>;
}
