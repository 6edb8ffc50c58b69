//! Free-form roadmap checklist items

use crate::error::ModelError;
use crate::ids::{IdeaId, RecordId, UserId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Unique key of a roadmap item
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoadmapKey {
    /// Owning user
    pub user_id: UserId,
    /// Idea
    pub idea_id: IdeaId,
    /// Never blank
    pub step_name: String,
}

impl RoadmapKey {
    /// Create key, rejecting blank step names
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyStepName`] for empty or whitespace-only names.
    pub fn new(
        user_id: UserId,
        idea_id: IdeaId,
        step_name: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let step_name = step_name.into();
        if step_name.trim().is_empty() {
            return Err(ModelError::EmptyStepName);
        }
        Ok(Self {
            user_id,
            idea_id,
            step_name,
        })
    }
}

/// One user-defined checklist entry
///
/// Unlike validation steps, roadmap items can be un-completed and edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapItem {
    /// Record identifier
    pub id: RecordId,
    /// One item per (user, idea, step name)
    pub key: RoadmapKey,
    completed_at: Option<Timestamp>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Evidence URL
    pub link: Option<String>,
    /// Fixes display order
    pub created_at: Timestamp,
    /// Last write
    pub updated_at: Timestamp,
}

impl RoadmapItem {
    /// New item with the given fields
    #[must_use]
    pub fn new(
        key: RoadmapKey,
        completed: bool,
        notes: Option<String>,
        link: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: RecordId::new(),
            key,
            completed_at: completed.then_some(now),
            notes,
            link,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the mutable fields
    ///
    /// `completed_at` is recomputed from `completed` on every call.
    pub fn apply(
        &mut self,
        completed: bool,
        notes: Option<String>,
        link: Option<String>,
        now: Timestamp,
    ) {
        self.completed_at = completed.then_some(now);
        self.notes = notes;
        self.link = link;
        self.updated_at = now;
    }

    /// Whether the item is checked off
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// When the item was last checked off
    #[inline]
    #[must_use]
    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn key(name: &str) -> RoadmapKey {
        RoadmapKey::new(UserId::new("u").unwrap(), IdeaId::new_v4(), name).unwrap()
    }

    #[test]
    fn blank_step_name_rejected() {
        let err = RoadmapKey::new(UserId::new("u").unwrap(), IdeaId::new_v4(), "  ");
        assert_eq!(err, Err(ModelError::EmptyStepName));
    }

    #[test]
    fn uncompleting_clears_timestamp() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let mut item = RoadmapItem::new(key("Interview 5 users"), true, None, None, t0);
        assert_eq!(item.completed_at(), Some(t0));

        item.apply(false, Some("redo".into()), None, t0 + Duration::hours(1));
        assert!(!item.is_completed());
        assert_eq!(item.completed_at(), None);
        assert_eq!(item.notes.as_deref(), Some("redo"));
        assert_eq!(item.created_at, t0);
    }
}
