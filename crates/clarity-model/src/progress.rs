//! Per-step validation progress records

use crate::ids::{IdeaId, RecordId, UserId};
use crate::step::ValidationStep;
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Unique key of a progress record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressKey {
    /// Owning user
    pub user_id: UserId,
    /// Idea
    pub idea_id: IdeaId,
    /// Validation step
    pub step: ValidationStep,
}

impl ProgressKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(user_id: UserId, idea_id: IdeaId, step: ValidationStep) -> Self {
        Self {
            user_id,
            idea_id,
            step,
        }
    }
}

/// Completion record for one (user, idea, step)
///
/// `completed` is derived from `completed_at`, so the two can never disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Record identifier
    pub id: RecordId,
    /// One record per (user, idea, step)
    pub key: ProgressKey,
    completed_at: Option<Timestamp>,
    /// Creation time
    pub created_at: Timestamp,
    /// Last write
    pub updated_at: Timestamp,
}

impl ProgressRecord {
    /// Record created and completed in the same write
    #[must_use]
    pub fn completed(key: ProgressKey, now: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            key,
            completed_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    /// Record that exists but is not completed
    ///
    /// Not produced by the tracker itself; stores migrated from older
    /// schemas may still hold such rows.
    #[must_use]
    pub fn pending(key: ProgressKey, now: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            key,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark completed at `now`; a completed record keeps its first timestamp
    pub fn complete(&mut self, now: Timestamp) {
        if self.completed_at.is_none() {
            self.completed_at = Some(now);
            self.updated_at = now;
        }
    }

    /// Whether the step is done
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// When the step was first completed
    #[inline]
    #[must_use]
    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }
}

/// `round(completed / total * 100)` with half-up rounding; 0 when `total` is 0
#[must_use]
pub fn completion_percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    // half-up: floor((200c + t) / 2t)
    ((completed * 200 + total) / (total * 2)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn key() -> ProgressKey {
        ProgressKey::new(
            UserId::new("u").unwrap(),
            IdeaId::new_v4(),
            ValidationStep::Tweet,
        )
    }

    #[test]
    fn completed_record_has_timestamp() {
        let now = Utc.with_ymd_and_hms(2025, 6, 8, 12, 0, 0).unwrap();
        let record = ProgressRecord::completed(key(), now);
        assert!(record.is_completed());
        assert_eq!(record.completed_at(), Some(now));
    }

    #[test]
    fn complete_keeps_first_timestamp() {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 8, 12, 0, 0).unwrap();
        let mut record = ProgressRecord::pending(key(), t0);
        assert!(!record.is_completed());

        record.complete(t0 + Duration::minutes(5));
        record.complete(t0 + Duration::minutes(10));
        assert_eq!(record.completed_at(), Some(t0 + Duration::minutes(5)));
    }

    #[test]
    fn percentage_fixed_points() {
        assert_eq!(completion_percentage(0, 5), 0);
        assert_eq!(completion_percentage(3, 5), 60);
        assert_eq!(completion_percentage(5, 5), 100);
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(1, 3), 33);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(1, 8), 13); // 12.5 rounds up
    }

    proptest! {
        #[test]
        fn prop_percentage_matches_half_up_rounding(
            total in 1usize..200,
            completed in 0usize..200,
        ) {
            let completed = completed.min(total);
            let p = u64::from(completion_percentage(completed, total));
            let (c, t) = (completed as u64, total as u64);
            // p == floor(100c/t + 1/2)  <=>  2pt <= 200c + t < 2pt + 2t
            prop_assert!(2 * p * t <= 200 * c + t);
            prop_assert!(200 * c + t < 2 * p * t + 2 * t);
        }
    }
}
