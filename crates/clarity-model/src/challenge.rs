//! The 48-hour validation challenge record

use crate::ids::{IdeaId, RecordId, UserId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Unique key of a challenge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChallengeKey {
    /// Owning user
    pub user_id: UserId,
    /// Idea
    pub idea_id: IdeaId,
}

impl ChallengeKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(user_id: UserId, idea_id: IdeaId) -> Self {
        Self { user_id, idea_id }
    }
}

/// Persisted lifecycle of a challenge
///
/// Expiry is a function of time and is never stored, so only the two
/// persisted states exist here. `Completed` is reached once and kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChallengeState {
    /// Timer running, completion not yet observed
    Active,
    /// Completion observed by a status read at `at`
    Completed {
        /// First observed completion
        at: Timestamp,
    },
}

/// A user's challenge for one idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Record identifier
    pub id: RecordId,
    /// One challenge per (user, idea)
    pub key: ChallengeKey,
    started_at: Timestamp,
    state: ChallengeState,
    /// Last write
    pub updated_at: Timestamp,
}

impl Challenge {
    /// Start a new challenge at `now`
    #[must_use]
    pub fn start(key: ChallengeKey, now: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            key,
            started_at: now,
            state: ChallengeState::Active,
            updated_at: now,
        }
    }

    /// Transition `Active -> Completed`
    ///
    /// Returns `false` and leaves the record untouched when it was already
    /// completed; the first completion timestamp always wins.
    pub fn complete(&mut self, at: Timestamp) -> bool {
        match self.state {
            ChallengeState::Active => {
                self.state = ChallengeState::Completed { at };
                self.updated_at = at;
                true
            }
            ChallengeState::Completed { .. } => false,
        }
    }

    /// When the timer started
    #[inline]
    #[must_use]
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Persisted state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ChallengeState {
        self.state
    }

    /// Completion timestamp, if completed
    #[inline]
    #[must_use]
    pub fn completed_at(&self) -> Option<Timestamp> {
        match self.state {
            ChallengeState::Completed { at } => Some(at),
            ChallengeState::Active => None,
        }
    }

    /// Whether completion has been persisted
    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self.state, ChallengeState::Completed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn key() -> ChallengeKey {
        ChallengeKey::new(UserId::new("u").unwrap(), IdeaId::new_v4())
    }

    #[test]
    fn new_challenge_is_active() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let challenge = Challenge::start(key(), t0);
        assert_eq!(challenge.state(), ChallengeState::Active);
        assert_eq!(challenge.started_at(), t0);
        assert_eq!(challenge.completed_at(), None);
    }

    #[test]
    fn completion_is_write_once() {
        let t0 = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut challenge = Challenge::start(key(), t0);

        assert!(challenge.complete(t0 + Duration::hours(2)));
        assert!(!challenge.complete(t0 + Duration::hours(3)));
        assert_eq!(challenge.completed_at(), Some(t0 + Duration::hours(2)));
        assert_eq!(challenge.started_at(), t0);
    }
}
