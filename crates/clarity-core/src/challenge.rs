//! The 48-hour validation challenge
//!
//! # State machine
//!
//! ```text
//! NotStarted ──start──► Active ──(≥ required steps before deadline, seen by a read)──► Completed
//!                         │
//!                         └──(deadline passes first)──► Expired
//! ```
//!
//! Only `Active` and `Completed` are persisted. `Expired` is derived from the
//! clock on every read. Completion is discovered by reads: [`evaluate`] is a
//! pure decision over (challenge, progress, now) and [`ChallengeEvaluator`]
//! persists the completion it asks for with a compare-and-set, so the first
//! observer's timestamp wins.

use crate::error::{ClarityError, ClarityResult};
use crate::progress::{ProgressSnapshot, ProgressTracker};
use clarity_model::{Challenge, ChallengeKey, IdeaId, RecordId, Timestamp, UserId};
use clarity_store::{ChallengeStore, ChallengeUpdate, Clock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Duration and success threshold of a challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeRules {
    /// Window length measured from `started_at`
    pub duration: chrono::Duration,
    /// Completed steps needed for success
    pub required_steps: usize,
}

impl ChallengeRules {
    /// Create rules
    #[inline]
    #[must_use]
    pub fn new(duration: chrono::Duration, required_steps: usize) -> Self {
        Self {
            duration,
            required_steps,
        }
    }
}

impl Default for ChallengeRules {
    fn default() -> Self {
        Self::new(chrono::Duration::hours(48), 3)
    }
}

/// Observable lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengePhase {
    /// No challenge record
    NotStarted,
    /// Running, deadline not reached
    Active,
    /// Completion recorded
    Completed,
    /// Deadline passed without completion
    Expired,
}

/// Phases reachable in one step from `from`
#[must_use]
pub fn allowed_transitions(from: ChallengePhase) -> Vec<ChallengePhase> {
    match from {
        ChallengePhase::NotStarted => vec![ChallengePhase::Active],
        ChallengePhase::Active => vec![ChallengePhase::Completed, ChallengePhase::Expired],
        ChallengePhase::Completed | ChallengePhase::Expired => vec![],
    }
}

/// Whether an observer may see `from` followed by `to`
#[must_use]
pub fn is_allowed(from: ChallengePhase, to: ChallengePhase) -> bool {
    from == to || allowed_transitions(from).contains(&to)
}

/// What a status read reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    /// Challenge record id
    pub id: RecordId,
    /// When the timer started
    pub started_at: Timestamp,
    /// Deadline; saturates at the latest representable instant
    pub end_time: Timestamp,
    /// First observed completion
    pub completed_at: Option<Timestamp>,
    /// Whole seconds left, never negative
    pub time_remaining_seconds: i64,
    /// Deadline reached
    pub is_expired: bool,
    /// Persisted completion
    pub is_completed: bool,
    /// Distinct validation steps completed
    pub completed_steps: usize,
    /// Threshold from the rules
    pub required_steps: usize,
    /// Transient: enough steps right now and still within the deadline
    pub success: bool,
}

impl ChallengeView {
    /// Lifecycle phase; a completed challenge stays completed past its deadline
    #[must_use]
    pub fn phase(&self) -> ChallengePhase {
        if self.is_completed {
            ChallengePhase::Completed
        } else if self.is_expired {
            ChallengePhase::Expired
        } else {
            ChallengePhase::Active
        }
    }
}

/// Result of [`evaluate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// View to report, already reflecting `completion`
    pub view: ChallengeView,
    /// Completion timestamp the caller must persist, if any
    pub completion: Option<Timestamp>,
}

/// Decide the status of `challenge` at `now`
#[must_use]
pub fn evaluate(
    challenge: &Challenge,
    progress: &ProgressSnapshot,
    now: Timestamp,
    rules: &ChallengeRules,
) -> Evaluation {
    let end_time = challenge
        .started_at()
        .checked_add_signed(rules.duration)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    let time_remaining_seconds = (end_time - now).num_seconds().max(0);
    let is_expired = time_remaining_seconds == 0;
    let success = progress.completed_steps >= rules.required_steps && !is_expired;

    let completion = (success && !challenge.is_completed()).then_some(now);
    let completed_at = challenge.completed_at().or(completion);

    Evaluation {
        view: ChallengeView {
            id: challenge.id,
            started_at: challenge.started_at(),
            end_time,
            completed_at,
            time_remaining_seconds,
            is_expired,
            is_completed: completed_at.is_some(),
            completed_steps: progress.completed_steps,
            required_steps: rules.required_steps,
            success,
        },
        completion,
    }
}

/// Answer of [`ChallengeEvaluator::status`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeStatus {
    /// No challenge for this user and idea
    NotStarted,
    /// Current view of the existing challenge
    Started(ChallengeView),
}

impl ChallengeStatus {
    /// Lifecycle phase
    #[must_use]
    pub fn phase(&self) -> ChallengePhase {
        match self {
            Self::NotStarted => ChallengePhase::NotStarted,
            Self::Started(view) => view.phase(),
        }
    }
}

/// Answer of [`ChallengeEvaluator::start`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    /// Status right after the start
    pub view: ChallengeView,
    /// `false` when a challenge already existed; its timer is untouched
    pub newly_started: bool,
}

/// Starts challenges and evaluates their status
#[derive(Clone)]
pub struct ChallengeEvaluator {
    store: Arc<dyn ChallengeStore>,
    progress: ProgressTracker,
    clock: Arc<dyn Clock>,
    rules: ChallengeRules,
}

impl ChallengeEvaluator {
    /// Create evaluator
    pub fn new(
        store: Arc<dyn ChallengeStore>,
        progress: ProgressTracker,
        clock: Arc<dyn Clock>,
        rules: ChallengeRules,
    ) -> Self {
        Self {
            store,
            progress,
            clock,
            rules,
        }
    }

    /// Rules in force
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &ChallengeRules {
        &self.rules
    }

    /// Start the challenge for (user, idea); a no-op if one exists
    pub async fn start(&self, user_id: &UserId, idea_id: &IdeaId) -> ClarityResult<StartOutcome> {
        let key = ChallengeKey::new(user_id.clone(), *idea_id);

        if let Some(existing) = self.store.find(&key).await? {
            tracing::debug!(user_id = %user_id, idea_id = %idea_id, "challenge already started");
            return Ok(StartOutcome {
                view: self.observe(existing).await?,
                newly_started: false,
            });
        }

        let (challenge, newly_started) =
            match self.store.insert(Challenge::start(key.clone(), self.clock.now())).await {
                Ok(created) => {
                    tracing::info!(
                        user_id = %user_id,
                        idea_id = %idea_id,
                        started_at = %created.started_at(),
                        "challenge started"
                    );
                    (created, true)
                }
                Err(err) if err.is_conflict() => {
                    tracing::debug!(idea_id = %idea_id, "lost challenge start race, re-reading");
                    (self.reread(&key).await?, false)
                }
                Err(err) => return Err(err.into()),
            };

        Ok(StartOutcome {
            view: self.observe(challenge).await?,
            newly_started,
        })
    }

    /// Current status; may persist completion as a side effect
    pub async fn status(
        &self,
        user_id: &UserId,
        idea_id: &IdeaId,
    ) -> ClarityResult<ChallengeStatus> {
        let key = ChallengeKey::new(user_id.clone(), *idea_id);
        match self.store.find(&key).await? {
            Some(challenge) => Ok(ChallengeStatus::Started(self.observe(challenge).await?)),
            None => Ok(ChallengeStatus::NotStarted),
        }
    }

    /// Evaluate and persist any completion the evaluation asks for
    async fn observe(&self, challenge: Challenge) -> ClarityResult<ChallengeView> {
        let progress = self
            .progress
            .snapshot(&challenge.key.user_id, &challenge.key.idea_id)
            .await?;
        let now = self.clock.now();
        let evaluation = evaluate(&challenge, &progress, now, &self.rules);

        let Some(at) = evaluation.completion else {
            return Ok(evaluation.view);
        };

        match self.store.update(challenge.id, ChallengeUpdate::Complete { at }).await {
            Ok(_) => {
                tracing::info!(
                    user_id = %challenge.key.user_id,
                    idea_id = %challenge.key.idea_id,
                    completed_at = %at,
                    completed_steps = progress.completed_steps,
                    "challenge completed"
                );
                Ok(evaluation.view)
            }
            Err(err) if err.is_conflict() => {
                // Another reader completed it first; report its timestamp
                let winner = self.reread(&challenge.key).await?;
                Ok(evaluate(&winner, &progress, now, &self.rules).view)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn reread(&self, key: &ChallengeKey) -> ClarityResult<Challenge> {
        self.store.find(key).await?.ok_or_else(|| {
            ClarityError::storage(format!(
                "challenge for idea {} missing after conflict",
                key.idea_id
            ))
        })
    }
}

impl std::fmt::Debug for ChallengeEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeEvaluator")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
