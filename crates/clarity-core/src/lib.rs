//! Clarity Core - validation progress backend
//!
//! Tracks how far a founder has taken an idea through validation:
//! - Marks the five validation steps completed, idempotently
//! - Runs the 48-hour challenge, whose completion is discovered and recorded by status reads
//! - Serves AI-generated marketing artifacts through a freshness-windowed cache,
//!   substituting canned content when the generation backend is out of quota
//! - Keeps a free-form roadmap checklist and per-user saved ideas
//!
//! # Example
//!
//! ```rust,ignore
//! use clarity_core::{ClarityConfig, ClarityService, ServiceDeps};
//! use clarity_core::api::{IdeaRequest, MarkStepRequest};
//!
//! # async fn example(deps: ServiceDeps) -> Result<(), clarity_core::ErrorPayload> {
//! let service = ClarityService::new(deps, &ClarityConfig::default());
//!
//! let idea_id = "7f1c0a2e-8a4b-4c1e-9f55-2d3b6c7e8a90".to_string();
//! service.start_challenge("user-1", IdeaRequest { idea_id: idea_id.clone() }).await?;
//! let marked = service
//!     .mark_step("user-1", MarkStepRequest { idea_id: idea_id.clone(), step: "tweet".into() })
//!     .await?;
//!
//! println!("{}% done", marked.progress.completion_percentage);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod api;
pub mod artifacts;
pub mod challenge;
pub mod config;
pub mod error;
pub mod generation_cache;
pub mod progress;
pub mod roadmap;
pub mod saved;
pub mod service;

// Re-exports for convenience
pub use artifacts::{ArtifactResponse, ArtifactService};
pub use challenge::{
    allowed_transitions, evaluate, ChallengeEvaluator, ChallengePhase, ChallengeRules,
    ChallengeStatus, ChallengeView, Evaluation, StartOutcome,
};
pub use config::{CatalogCacheConfig, ChallengeConfig, ClarityConfig, ConfigError, FreshnessConfig};
pub use error::{ClarityError, ClarityResult, ErrorKind, ErrorPayload};
pub use generation_cache::{CacheLookup, Generated, GenerationCache};
pub use progress::{ProgressSnapshot, ProgressTracker, StepStatus};
pub use roadmap::{RoadmapChange, RoadmapOverview, RoadmapSummary, RoadmapTracker};
pub use saved::{SavedIdeaView, SavedIdeas};
pub use service::{ClarityService, ServiceDeps};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Clarity Core
    pub use crate::{
        ChallengeEvaluator, ChallengePhase, ChallengeStatus, ClarityConfig, ClarityError,
        ClarityService, ErrorKind, ProgressSnapshot, ProgressTracker, ServiceDeps,
    };
    pub use clarity_model::{ArtifactKind, IdeaId, UserId, ValidationStep};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
