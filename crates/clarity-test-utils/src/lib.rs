//! Testing utilities for the Clarity workspace
//!
//! Shared fixtures, a manual-clock harness, fault-injecting stores and
//! scripted generators.

#![allow(missing_docs)]

pub mod generators;
pub mod stores;

pub use generators::{GatedGenerator, ScriptedGenerator, SlowGenerator};
pub use stores::{RacingChallengeStore, RacingProgressStore, UnavailableStore};

use chrono::TimeZone;
use clarity_core::{ClarityConfig, ClarityService, ServiceDeps};
use clarity_generation::TextGenerator;
use clarity_model::{IdeaId, PublicIdea, Timestamp, UserId};
use clarity_store::{
    InMemoryArtifactStore, InMemoryCatalog, InMemoryChallengeStore, InMemoryProgressStore,
    ManualClock,
};
use std::sync::Arc;

pub const TEST_USER: &str = "user-7f3a";

/// Fixed start time shared by tests
pub fn t0() -> Timestamp {
    chrono::Utc
        .with_ymd_and_hms(2025, 6, 1, 0, 0, 0)
        .single()
        .unwrap()
}

pub fn test_user() -> UserId {
    UserId::new(TEST_USER).unwrap()
}

pub fn devlog_idea() -> PublicIdea {
    PublicIdea::new(IdeaId::new_v4(), "DevLog")
        .with_problem("Developers forget what they shipped last week")
        .with_description("Automatic changelog from commits and PRs")
        .with_demand_score(72)
}

pub fn sample_ideas() -> Vec<PublicIdea> {
    vec![
        devlog_idea(),
        PublicIdea::new(IdeaId::new_v4(), "InvoiceBot")
            .with_problem("Freelancers chase unpaid invoices by hand")
            .with_demand_score(88),
        PublicIdea::new(IdeaId::new_v4(), "StandupSync")
            .with_description("Async standups in Slack")
            .with_demand_score(41),
    ]
}

/// A fully wired service over in-memory stores and a manual clock
pub struct TestHarness {
    pub clock: Arc<ManualClock>,
    pub catalog: Arc<InMemoryCatalog>,
    pub progress: Arc<InMemoryProgressStore>,
    pub challenges: Arc<InMemoryChallengeStore>,
    pub artifacts: Arc<InMemoryArtifactStore>,
    pub service: ClarityService,
    pub idea: PublicIdea,
}

impl TestHarness {
    /// Default configuration, generator answering "generated text"
    pub fn new() -> Self {
        Self::with_generator(
            ClarityConfig::default(),
            Arc::new(ScriptedGenerator::new("test-model").with_default_reply("generated text")),
        )
    }

    pub fn with_generator(config: ClarityConfig, generator: Arc<dyn TextGenerator>) -> Self {
        let clock = Arc::new(ManualClock::new(t0()));
        let idea = devlog_idea();
        let catalog = Arc::new(InMemoryCatalog::with_ideas([idea.clone()]));
        let progress = Arc::new(InMemoryProgressStore::new());
        let challenges = Arc::new(InMemoryChallengeStore::new());
        let artifacts = Arc::new(InMemoryArtifactStore::new());

        let mut deps = ServiceDeps::in_memory(catalog.clone(), generator, clock.clone());
        deps.progress = progress.clone();
        deps.challenges = challenges.clone();
        deps.artifacts = artifacts.clone();

        Self {
            service: ClarityService::new(deps, &config),
            clock,
            catalog,
            progress,
            challenges,
            artifacts,
            idea,
        }
    }

    pub fn idea_id(&self) -> String {
        self.idea.id.to_string()
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.clock.advance(by);
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
