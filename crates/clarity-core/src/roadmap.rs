//! Free-form roadmap checklist per (user, idea)

use crate::error::{ClarityError, ClarityResult};
use clarity_model::{completion_percentage, IdeaId, RoadmapItem, RoadmapKey, UserId};
use clarity_store::{Clock, RoadmapStore, RoadmapUpdate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Requested state of one roadmap step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoadmapChange {
    /// Step to create or update
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

impl RoadmapChange {
    /// Change for `step_name`, not completed, no notes
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            ..Self::default()
        }
    }

    /// Mark completed or not
    #[must_use]
    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// With notes
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// With link
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Aggregate counts of a roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapSummary {
    /// Items on the roadmap
    pub total_steps: usize,
    /// Items currently completed
    pub completed_steps: usize,
    /// Rounded half-up; zero for an empty roadmap
    pub completion_percentage: u8,
}

/// Items in creation order plus their summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapOverview {
    /// Items in creation order
    pub items: Vec<RoadmapItem>,
    /// Aggregate counts
    pub summary: RoadmapSummary,
}

/// Upserts and lists roadmap items
#[derive(Clone)]
pub struct RoadmapTracker {
    store: Arc<dyn RoadmapStore>,
    clock: Arc<dyn Clock>,
}

impl RoadmapTracker {
    /// Create tracker
    pub fn new(store: Arc<dyn RoadmapStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Insert or overwrite the item named by `change.step_name`
    pub async fn update(
        &self,
        user_id: &UserId,
        idea_id: &IdeaId,
        change: RoadmapChange,
    ) -> ClarityResult<RoadmapItem> {
        let key = RoadmapKey::new(user_id.clone(), *idea_id, change.step_name)?;
        let now = self.clock.now();
        let update = RoadmapUpdate {
            completed: change.completed,
            notes: change.notes,
            link: change.link,
            at: now,
        };

        let existing = match self.store.find(&key).await? {
            Some(item) => item,
            None => {
                let item = RoadmapItem::new(
                    key.clone(),
                    update.completed,
                    update.notes.clone(),
                    update.link.clone(),
                    now,
                );
                match self.store.insert(item).await {
                    Ok(created) => {
                        tracing::info!(
                            idea_id = %idea_id,
                            step_name = %created.key.step_name,
                            completed = created.is_completed(),
                            "roadmap step created"
                        );
                        return Ok(created);
                    }
                    Err(err) if err.is_conflict() => {
                        self.store.find(&key).await?.ok_or_else(|| {
                            ClarityError::storage("roadmap item missing after conflict")
                        })?
                    }
                    Err(err) => return Err(err.into()),
                }
            }
        };

        let updated = self.store.update(existing.id, update).await?;
        tracing::info!(
            idea_id = %idea_id,
            step_name = %updated.key.step_name,
            completed = updated.is_completed(),
            "roadmap step updated"
        );
        Ok(updated)
    }

    /// Items ordered by creation with completion summary
    pub async fn list(&self, user_id: &UserId, idea_id: &IdeaId) -> ClarityResult<RoadmapOverview> {
        let items = self.store.list(user_id, idea_id).await?;
        let completed_steps = items.iter().filter(|i| i.is_completed()).count();
        let summary = RoadmapSummary {
            total_steps: items.len(),
            completed_steps,
            completion_percentage: completion_percentage(completed_steps, items.len()),
        };
        Ok(RoadmapOverview { items, summary })
    }
}

impl std::fmt::Debug for RoadmapTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadmapTracker").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::{Duration, TimeZone, Utc};
    use clarity_store::{InMemoryRoadmapStore, ManualClock};

    fn tracker() -> (RoadmapTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()));
        let store = Arc::new(InMemoryRoadmapStore::new());
        (RoadmapTracker::new(store, clock.clone()), clock)
    }

    #[tokio::test]
    async fn empty_roadmap_is_zero_percent() {
        let (tracker, _) = tracker();
        let overview = tracker.list(&UserId::new("u").unwrap(), &IdeaId::new_v4()).await.unwrap();
        assert!(overview.items.is_empty());
        assert_eq!(overview.summary.completion_percentage, 0);
    }

    #[tokio::test]
    async fn uncompleting_clears_timestamp() {
        let (tracker, clock) = tracker();
        let user = UserId::new("u").unwrap();
        let idea = IdeaId::new_v4();

        let done = tracker
            .update(&user, &idea, RoadmapChange::new("Build MVP").completed(true).with_notes("v0"))
            .await
            .unwrap();
        assert_eq!(done.completed_at(), Some(clock.now()));

        clock.advance(Duration::hours(1));
        let undone = tracker
            .update(&user, &idea, RoadmapChange::new("Build MVP"))
            .await
            .unwrap();
        assert_eq!(undone.id, done.id);
        assert!(!undone.is_completed());
        assert_eq!(undone.completed_at(), None);
        assert_eq!(undone.notes, None);
    }

    #[tokio::test]
    async fn recompleting_resets_timestamp() {
        let (tracker, clock) = tracker();
        let user = UserId::new("u").unwrap();
        let idea = IdeaId::new_v4();

        tracker.update(&user, &idea, RoadmapChange::new("Launch").completed(true)).await.unwrap();
        clock.advance(Duration::hours(2));
        let again = tracker
            .update(
                &user,
                &idea,
                RoadmapChange::new("Launch").completed(true).with_link("https://x.dev"),
            )
            .await
            .unwrap();
        assert_eq!(again.completed_at(), Some(clock.now()));
        assert_eq!(again.link.as_deref(), Some("https://x.dev"));
    }

    #[tokio::test]
    async fn list_in_creation_order_with_summary() {
        let (tracker, clock) = tracker();
        let user = UserId::new("u").unwrap();
        let idea = IdeaId::new_v4();

        for (name, done) in [("Research", true), ("Build", false), ("Launch", true)] {
            tracker.update(&user, &idea, RoadmapChange::new(name).completed(done)).await.unwrap();
            clock.advance(Duration::seconds(1));
        }

        let overview = tracker.list(&user, &idea).await.unwrap();
        let names: Vec<&str> = overview.items.iter().map(|i| i.key.step_name.as_str()).collect();
        assert_eq!(names, vec!["Research", "Build", "Launch"]);
        assert_eq!(overview.summary.total_steps, 3);
        assert_eq!(overview.summary.completed_steps, 2);
        assert_eq!(overview.summary.completion_percentage, 67);
    }

    #[tokio::test]
    async fn blank_step_name_is_invalid() {
        let (tracker, _) = tracker();
        let err = tracker
            .update(&UserId::new("u").unwrap(), &IdeaId::new_v4(), RoadmapChange::new("  "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
