//! Store wrappers that inject races and outages

use async_trait::async_trait;
use clarity_model::{
    ArtifactKind, Challenge, ChallengeKey, GeneratedArtifact, IdeaId, ProgressKey, ProgressRecord,
    PublicIdea, RecordId, RoadmapItem, RoadmapKey, SavedIdea, SavedIdeaKey, Timestamp, UserId,
};
use clarity_store::{
    ArtifactStore, ChallengeStore, ChallengeUpdate, IdeaCatalog, InMemoryChallengeStore,
    InMemoryProgressStore, ProgressStore, ProgressUpdate, RoadmapStore, RoadmapUpdate,
    SavedIdeaStore, StoreError, StoreResult,
};
use parking_lot::Mutex;

/// Progress store where a rival writer wins the next insert
///
/// When armed, `insert` first stores a completed record stamped `rival_at`
/// for the same key, then reports `Conflict` to the caller.
#[derive(Default)]
pub struct RacingProgressStore {
    pub inner: InMemoryProgressStore,
    rival_at: Mutex<Option<Timestamp>>,
}

impl RacingProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self, rival_at: Timestamp) {
        *self.rival_at.lock() = Some(rival_at);
    }
}

#[async_trait]
impl ProgressStore for RacingProgressStore {
    async fn find(&self, key: &ProgressKey) -> StoreResult<Option<ProgressRecord>> {
        self.inner.find(key).await
    }

    async fn list(&self, user_id: &UserId, idea_id: &IdeaId) -> StoreResult<Vec<ProgressRecord>> {
        self.inner.list(user_id, idea_id).await
    }

    async fn insert(&self, record: ProgressRecord) -> StoreResult<ProgressRecord> {
        let rival = self.rival_at.lock().take();
        if let Some(at) = rival {
            self.inner
                .insert(ProgressRecord::completed(record.key.clone(), at))
                .await?;
        }
        self.inner.insert(record).await
    }

    async fn update(&self, id: RecordId, update: ProgressUpdate) -> StoreResult<ProgressRecord> {
        self.inner.update(id, update).await
    }
}

/// Challenge store where a rival wins the next start or completion
#[derive(Default)]
pub struct RacingChallengeStore {
    pub inner: InMemoryChallengeStore,
    rival_start: Mutex<Option<Timestamp>>,
    rival_completion: Mutex<Option<Timestamp>>,
}

impl RacingChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next insert loses to a challenge started at `at`
    pub fn arm_start(&self, at: Timestamp) {
        *self.rival_start.lock() = Some(at);
    }

    /// Next completion loses to one recorded at `at`
    pub fn arm_completion(&self, at: Timestamp) {
        *self.rival_completion.lock() = Some(at);
    }
}

#[async_trait]
impl ChallengeStore for RacingChallengeStore {
    async fn find(&self, key: &ChallengeKey) -> StoreResult<Option<Challenge>> {
        self.inner.find(key).await
    }

    async fn insert(&self, challenge: Challenge) -> StoreResult<Challenge> {
        let rival = self.rival_start.lock().take();
        if let Some(at) = rival {
            self.inner
                .insert(Challenge::start(challenge.key.clone(), at))
                .await?;
        }
        self.inner.insert(challenge).await
    }

    async fn update(&self, id: RecordId, update: ChallengeUpdate) -> StoreResult<Challenge> {
        let rival = self.rival_completion.lock().take();
        if let Some(at) = rival {
            self.inner.update(id, ChallengeUpdate::Complete { at }).await?;
        }
        self.inner.update(id, update).await
    }
}

/// Every call fails with `Unavailable`
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl ProgressStore for UnavailableStore {
    async fn find(&self, _key: &ProgressKey) -> StoreResult<Option<ProgressRecord>> {
        down()
    }
    async fn list(&self, _user_id: &UserId, _idea_id: &IdeaId) -> StoreResult<Vec<ProgressRecord>> {
        down()
    }
    async fn insert(&self, _record: ProgressRecord) -> StoreResult<ProgressRecord> {
        down()
    }
    async fn update(&self, _id: RecordId, _update: ProgressUpdate) -> StoreResult<ProgressRecord> {
        down()
    }
}

#[async_trait]
impl ChallengeStore for UnavailableStore {
    async fn find(&self, _key: &ChallengeKey) -> StoreResult<Option<Challenge>> {
        down()
    }
    async fn insert(&self, _challenge: Challenge) -> StoreResult<Challenge> {
        down()
    }
    async fn update(&self, _id: RecordId, _update: ChallengeUpdate) -> StoreResult<Challenge> {
        down()
    }
}

#[async_trait]
impl RoadmapStore for UnavailableStore {
    async fn find(&self, _key: &RoadmapKey) -> StoreResult<Option<RoadmapItem>> {
        down()
    }
    async fn list(&self, _user_id: &UserId, _idea_id: &IdeaId) -> StoreResult<Vec<RoadmapItem>> {
        down()
    }
    async fn insert(&self, _item: RoadmapItem) -> StoreResult<RoadmapItem> {
        down()
    }
    async fn update(&self, _id: RecordId, _update: RoadmapUpdate) -> StoreResult<RoadmapItem> {
        down()
    }
}

#[async_trait]
impl ArtifactStore for UnavailableStore {
    async fn latest(
        &self,
        _idea_id: &IdeaId,
        _kind: ArtifactKind,
    ) -> StoreResult<Option<GeneratedArtifact>> {
        down()
    }
    async fn insert(&self, _artifact: GeneratedArtifact) -> StoreResult<GeneratedArtifact> {
        down()
    }
}

#[async_trait]
impl SavedIdeaStore for UnavailableStore {
    async fn find(&self, _key: &SavedIdeaKey) -> StoreResult<Option<SavedIdea>> {
        down()
    }
    async fn insert(&self, _saved: SavedIdea) -> StoreResult<SavedIdea> {
        down()
    }
    async fn list(&self, _user_id: &UserId) -> StoreResult<Vec<SavedIdea>> {
        down()
    }
    async fn delete(&self, _key: &SavedIdeaKey) -> StoreResult<bool> {
        down()
    }
}

#[async_trait]
impl IdeaCatalog for UnavailableStore {
    async fn get(&self, _id: &IdeaId) -> StoreResult<Option<PublicIdea>> {
        down()
    }
    async fn list_by_demand(&self) -> StoreResult<Vec<PublicIdea>> {
        down()
    }
}
