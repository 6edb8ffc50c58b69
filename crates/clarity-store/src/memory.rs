//! In-memory stores
//!
//! Sharded `DashMap`s keyed by each entity's unique key. The entry API gives
//! per-key atomic check-and-insert, which is the same guarantee a unique index
//! gives a relational store.

use crate::error::{StoreError, StoreResult};
use crate::traits::{
    ArtifactStore, ChallengeStore, ChallengeUpdate, ProgressStore, ProgressUpdate, RoadmapStore,
    RoadmapUpdate, SavedIdeaStore,
};
use async_trait::async_trait;
use clarity_model::{
    ArtifactKind, Challenge, ChallengeKey, GeneratedArtifact, IdeaId, ProgressKey, ProgressRecord,
    RecordId, RoadmapItem, RoadmapKey, SavedIdea, SavedIdeaKey, UserId,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Progress records keyed by (user, idea, step)
#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    by_key: DashMap<ProgressKey, ProgressRecord>,
    by_id: DashMap<RecordId, ProgressKey>,
}

impl InMemoryProgressStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted records
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn find(&self, key: &ProgressKey) -> StoreResult<Option<ProgressRecord>> {
        Ok(self.by_key.get(key).map(|r| r.value().clone()))
    }

    async fn list(&self, user_id: &UserId, idea_id: &IdeaId) -> StoreResult<Vec<ProgressRecord>> {
        let mut records: Vec<ProgressRecord> = self
            .by_key
            .iter()
            .filter(|r| &r.key().user_id == user_id && &r.key().idea_id == idea_id)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.key.step);
        Ok(records)
    }

    async fn insert(&self, record: ProgressRecord) -> StoreResult<ProgressRecord> {
        match self.by_key.entry(record.key.clone()) {
            Entry::Occupied(_) => Err(StoreError::conflict("progress record", &record.key)),
            Entry::Vacant(slot) => {
                self.by_id.insert(record.id, record.key.clone());
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn update(&self, id: RecordId, update: ProgressUpdate) -> StoreResult<ProgressRecord> {
        let key = self
            .by_id
            .get(&id)
            .map(|k| k.value().clone())
            .ok_or_else(|| StoreError::not_found("progress record", id))?;
        let mut record = self
            .by_key
            .get_mut(&key)
            .ok_or_else(|| StoreError::not_found("progress record", id))?;

        match update {
            ProgressUpdate::MarkCompleted { at } => record.complete(at),
        }
        Ok(record.clone())
    }
}

/// Challenges keyed by (user, idea)
#[derive(Debug, Default)]
pub struct InMemoryChallengeStore {
    by_key: DashMap<ChallengeKey, Challenge>,
    by_id: DashMap<RecordId, ChallengeKey>,
}

impl InMemoryChallengeStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted challenges
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Whether the store is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

#[async_trait]
impl ChallengeStore for InMemoryChallengeStore {
    async fn find(&self, key: &ChallengeKey) -> StoreResult<Option<Challenge>> {
        Ok(self.by_key.get(key).map(|c| c.value().clone()))
    }

    async fn insert(&self, challenge: Challenge) -> StoreResult<Challenge> {
        match self.by_key.entry(challenge.key.clone()) {
            Entry::Occupied(_) => Err(StoreError::conflict("challenge", &challenge.key)),
            Entry::Vacant(slot) => {
                self.by_id.insert(challenge.id, challenge.key.clone());
                slot.insert(challenge.clone());
                Ok(challenge)
            }
        }
    }

    async fn update(&self, id: RecordId, update: ChallengeUpdate) -> StoreResult<Challenge> {
        let key = self
            .by_id
            .get(&id)
            .map(|k| k.value().clone())
            .ok_or_else(|| StoreError::not_found("challenge", id))?;
        let mut challenge = self
            .by_key
            .get_mut(&key)
            .ok_or_else(|| StoreError::not_found("challenge", id))?;

        match update {
            ChallengeUpdate::Complete { at } => {
                if !challenge.complete(at) {
                    return Err(StoreError::conflict("challenge completion", id));
                }
            }
        }
        Ok(challenge.clone())
    }
}

/// Roadmap items keyed by (user, idea, step_name)
#[derive(Debug, Default)]
pub struct InMemoryRoadmapStore {
    by_key: DashMap<RoadmapKey, (u64, RoadmapItem)>,
    by_id: DashMap<RecordId, RoadmapKey>,
    seq: AtomicU64,
}

impl InMemoryRoadmapStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoadmapStore for InMemoryRoadmapStore {
    async fn find(&self, key: &RoadmapKey) -> StoreResult<Option<RoadmapItem>> {
        Ok(self.by_key.get(key).map(|e| e.value().1.clone()))
    }

    async fn list(&self, user_id: &UserId, idea_id: &IdeaId) -> StoreResult<Vec<RoadmapItem>> {
        let mut items: Vec<(u64, RoadmapItem)> = self
            .by_key
            .iter()
            .filter(|e| &e.key().user_id == user_id && &e.key().idea_id == idea_id)
            .map(|e| e.value().clone())
            .collect();
        items.sort_by(|(seq_a, a), (seq_b, b)| {
            a.created_at.cmp(&b.created_at).then(seq_a.cmp(seq_b))
        });
        Ok(items.into_iter().map(|(_, item)| item).collect())
    }

    async fn insert(&self, item: RoadmapItem) -> StoreResult<RoadmapItem> {
        match self.by_key.entry(item.key.clone()) {
            Entry::Occupied(_) => Err(StoreError::conflict("roadmap item", &item.key)),
            Entry::Vacant(slot) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                self.by_id.insert(item.id, item.key.clone());
                slot.insert((seq, item.clone()));
                Ok(item)
            }
        }
    }

    async fn update(&self, id: RecordId, update: RoadmapUpdate) -> StoreResult<RoadmapItem> {
        let key = self
            .by_id
            .get(&id)
            .map(|k| k.value().clone())
            .ok_or_else(|| StoreError::not_found("roadmap item", id))?;
        let mut entry = self
            .by_key
            .get_mut(&key)
            .ok_or_else(|| StoreError::not_found("roadmap item", id))?;

        let item = &mut entry.value_mut().1;
        item.apply(update.completed, update.notes, update.link, update.at);
        Ok(item.clone())
    }
}

/// Append-only artifact log
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    rows: Mutex<Vec<GeneratedArtifact>>,
}

impl InMemoryArtifactStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows across all ideas and kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// Whether the log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn latest(
        &self,
        idea_id: &IdeaId,
        kind: ArtifactKind,
    ) -> StoreResult<Option<GeneratedArtifact>> {
        let rows = self.rows.lock();
        // max_by_key keeps the last maximum, so equal timestamps resolve to the newest row
        Ok(rows
            .iter()
            .filter(|a| &a.idea_id == idea_id && a.kind == kind)
            .max_by_key(|a| a.generated_at)
            .cloned())
    }

    async fn insert(&self, artifact: GeneratedArtifact) -> StoreResult<GeneratedArtifact> {
        self.rows.lock().push(artifact.clone());
        Ok(artifact)
    }
}

/// Bookmarks keyed by (user, idea)
#[derive(Debug, Default)]
pub struct InMemorySavedIdeaStore {
    by_key: DashMap<SavedIdeaKey, (u64, SavedIdea)>,
    seq: AtomicU64,
}

impl InMemorySavedIdeaStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SavedIdeaStore for InMemorySavedIdeaStore {
    async fn find(&self, key: &SavedIdeaKey) -> StoreResult<Option<SavedIdea>> {
        Ok(self.by_key.get(key).map(|e| e.value().1.clone()))
    }

    async fn insert(&self, saved: SavedIdea) -> StoreResult<SavedIdea> {
        match self.by_key.entry(saved.key.clone()) {
            Entry::Occupied(_) => Err(StoreError::conflict("saved idea", &saved.key)),
            Entry::Vacant(slot) => {
                let seq = self.seq.fetch_add(1, Ordering::Relaxed);
                slot.insert((seq, saved.clone()));
                Ok(saved)
            }
        }
    }

    async fn list(&self, user_id: &UserId) -> StoreResult<Vec<SavedIdea>> {
        let mut saved: Vec<(u64, SavedIdea)> = self
            .by_key
            .iter()
            .filter(|e| &e.key().user_id == user_id)
            .map(|e| e.value().clone())
            .collect();
        saved.sort_by(|(seq_a, a), (seq_b, b)| {
            b.saved_at.cmp(&a.saved_at).then(seq_b.cmp(seq_a))
        });
        Ok(saved.into_iter().map(|(_, s)| s).collect())
    }

    async fn delete(&self, key: &SavedIdeaKey) -> StoreResult<bool> {
        Ok(self.by_key.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use clarity_model::{ArtifactContent, Provenance, ValidationStep};

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    #[tokio::test]
    async fn progress_insert_conflicts_on_duplicate_key() {
        let store = InMemoryProgressStore::new();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let key = ProgressKey::new(user(), IdeaId::new_v4(), ValidationStep::Landing);

        store
            .insert(ProgressRecord::completed(key.clone(), now))
            .await
            .unwrap();
        let err = store
            .insert(ProgressRecord::completed(key.clone(), now))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn progress_update_completes_pending_record() {
        let store = InMemoryProgressStore::new();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let key = ProgressKey::new(user(), IdeaId::new_v4(), ValidationStep::Survey);
        let pending = store
            .insert(ProgressRecord::pending(key.clone(), now))
            .await
            .unwrap();

        let later = now + Duration::minutes(3);
        let updated = store
            .update(pending.id, ProgressUpdate::MarkCompleted { at: later })
            .await
            .unwrap();
        assert_eq!(updated.completed_at(), Some(later));
        assert_eq!(store.find(&key).await.unwrap().unwrap().completed_at(), Some(later));
    }

    #[tokio::test]
    async fn progress_update_unknown_id_is_not_found() {
        let store = InMemoryProgressStore::new();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let err = store
            .update(RecordId::new(), ProgressUpdate::MarkCompleted { at: now })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn challenge_completion_is_compare_and_set() {
        let store = InMemoryChallengeStore::new();
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let challenge = store
            .insert(Challenge::start(ChallengeKey::new(user(), IdeaId::new_v4()), t0))
            .await
            .unwrap();

        let first = store
            .update(challenge.id, ChallengeUpdate::Complete { at: t0 + Duration::hours(1) })
            .await
            .unwrap();
        assert_eq!(first.completed_at(), Some(t0 + Duration::hours(1)));

        let second = store
            .update(challenge.id, ChallengeUpdate::Complete { at: t0 + Duration::hours(2) })
            .await;
        assert!(second.unwrap_err().is_conflict());

        let stored = store.find(&challenge.key).await.unwrap().unwrap();
        assert_eq!(stored.completed_at(), Some(t0 + Duration::hours(1)));
    }

    #[tokio::test]
    async fn roadmap_list_is_ordered_by_creation() {
        let store = InMemoryRoadmapStore::new();
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let idea = IdeaId::new_v4();

        for (offset, name) in [(2, "third"), (0, "first"), (1, "second")] {
            let key = RoadmapKey::new(user(), idea, name).unwrap();
            store
                .insert(RoadmapItem::new(key, false, None, None, t0 + Duration::minutes(offset)))
                .await
                .unwrap();
        }

        let names: Vec<String> = store
            .list(&user(), &idea)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.key.step_name)
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn artifact_latest_picks_newest() {
        let store = InMemoryArtifactStore::new();
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let idea = IdeaId::new_v4();

        for (minutes, text) in [(0, "old"), (30, "new")] {
            store
                .insert(GeneratedArtifact::new(
                    idea,
                    ArtifactKind::Tweet,
                    user(),
                    ArtifactContent::Text(text.into()),
                    Provenance::backend("test"),
                    t0 + Duration::minutes(minutes),
                ))
                .await
                .unwrap();
        }

        let latest = store.latest(&idea, ArtifactKind::Tweet).await.unwrap().unwrap();
        assert_eq!(latest.content.as_text(), Some("new"));
        assert!(store.latest(&idea, ArtifactKind::Survey).await.unwrap().is_none());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn saved_ideas_delete_reports_presence() {
        let store = InMemorySavedIdeaStore::new();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let key = SavedIdeaKey::new(user(), IdeaId::new_v4());

        store.insert(SavedIdea::new(key.clone(), now)).await.unwrap();
        assert!(store.delete(&key).await.unwrap());
        assert!(!store.delete(&key).await.unwrap());
    }
}
