//! Per-step validation progress

use crate::error::{ClarityError, ClarityResult};
use clarity_model::{
    completion_percentage, IdeaId, ProgressKey, ProgressRecord, Timestamp, UserId, ValidationStep,
};
use clarity_store::{Clock, ProgressStore, ProgressUpdate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Completion state of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepStatus {
    /// Whether the step is done
    pub completed: bool,
    /// First completion time
    pub completed_at: Option<Timestamp>,
}

/// Progress of a (user, idea) pair across all five steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Every step, in declaration order
    pub steps: BTreeMap<ValidationStep, StepStatus>,
    /// Always five
    pub total_steps: usize,
    /// Steps with a completion time
    pub completed_steps: usize,
    /// Rounded half-up
    pub completion_percentage: u8,
}

impl ProgressSnapshot {
    /// Build from stored records; missing steps count as not completed
    #[must_use]
    pub fn from_records(records: &[ProgressRecord]) -> Self {
        let mut steps: BTreeMap<ValidationStep, StepStatus> = ValidationStep::ALL
            .into_iter()
            .map(|step| (step, StepStatus::default()))
            .collect();

        for record in records {
            steps.insert(
                record.key.step,
                StepStatus {
                    completed: record.is_completed(),
                    completed_at: record.completed_at(),
                },
            );
        }

        let completed_steps = steps.values().filter(|s| s.completed).count();
        Self {
            steps,
            total_steps: ValidationStep::COUNT,
            completed_steps,
            completion_percentage: completion_percentage(completed_steps, ValidationStep::COUNT),
        }
    }

    /// Status of one step
    #[must_use]
    pub fn step(&self, step: ValidationStep) -> StepStatus {
        self.steps.get(&step).copied().unwrap_or_default()
    }
}

/// Records step completions
#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn ProgressStore>,
    clock: Arc<dyn Clock>,
}

impl ProgressTracker {
    /// Create tracker
    pub fn new(store: Arc<dyn ProgressStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Mark `step` completed; idempotent
    ///
    /// A step completed earlier keeps its original timestamp.
    pub async fn mark_completed(
        &self,
        user_id: &UserId,
        idea_id: &IdeaId,
        step: ValidationStep,
    ) -> ClarityResult<ProgressSnapshot> {
        let key = ProgressKey::new(user_id.clone(), *idea_id, step);
        self.ensure_completed(&key).await?;
        self.snapshot(user_id, idea_id).await
    }

    /// Current progress, read-only
    pub async fn snapshot(
        &self,
        user_id: &UserId,
        idea_id: &IdeaId,
    ) -> ClarityResult<ProgressSnapshot> {
        let records = self.store.list(user_id, idea_id).await?;
        Ok(ProgressSnapshot::from_records(&records))
    }

    async fn ensure_completed(&self, key: &ProgressKey) -> ClarityResult<()> {
        if let Some(existing) = self.store.find(key).await? {
            return self.complete_existing(existing).await;
        }

        let now = self.clock.now();
        match self.store.insert(ProgressRecord::completed(key.clone(), now)).await {
            Ok(_) => {
                tracing::info!(
                    user_id = %key.user_id,
                    idea_id = %key.idea_id,
                    step = %key.step,
                    "validation step completed"
                );
                Ok(())
            }
            Err(err) if err.is_conflict() => {
                tracing::debug!(step = %key.step, "lost progress insert race, re-reading");
                let existing = self.store.find(key).await?.ok_or_else(|| {
                    ClarityError::storage(format!(
                        "progress record for {} missing after conflict",
                        key.step
                    ))
                })?;
                self.complete_existing(existing).await
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn complete_existing(&self, existing: ProgressRecord) -> ClarityResult<()> {
        if existing.is_completed() {
            tracing::debug!(step = %existing.key.step, "step already completed");
            return Ok(());
        }
        let at = self.clock.now();
        self.store
            .update(existing.id, ProgressUpdate::MarkCompleted { at })
            .await?;
        tracing::info!(
            user_id = %existing.key.user_id,
            idea_id = %existing.key.idea_id,
            step = %existing.key.step,
            "validation step completed"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker").finish_non_exhaustive()
    }
}
