//! Clarity data model
//!
//! Typed records for the validation-progress subsystem:
//! - **Identifiers**: [`UserId`], [`IdeaId`], [`RecordId`]
//! - **Validation steps**: the closed [`ValidationStep`] set and per-step [`ProgressRecord`]s
//! - **Challenges**: the 48-hour [`Challenge`] with its tagged [`ChallengeState`]
//! - **Roadmap**: free-form [`RoadmapItem`] checklist entries
//! - **Artifacts**: cached [`GeneratedArtifact`]s and their [`Provenance`]
//! - **Catalog**: read-only [`PublicIdea`] rows and per-user [`SavedIdea`] bookmarks
//!
//! # Example
//!
//! ```rust
//! use clarity_model::{IdeaId, UserId, ValidationStep};
//! use std::str::FromStr;
//!
//! let user = UserId::new("user-1").unwrap();
//! let idea = IdeaId::parse("7f1c0a2e-8a4b-4c1e-9f55-2d3b6c7e8a90").unwrap();
//! let step = ValidationStep::from_str("tweet").unwrap();
//!
//! assert_eq!(step.as_str(), "tweet");
//! assert_eq!(user.as_str(), "user-1");
//! assert_eq!(idea.to_string(), "7f1c0a2e-8a4b-4c1e-9f55-2d3b6c7e8a90");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod artifact;
pub mod challenge;
pub mod error;
pub mod ids;
pub mod idea;
pub mod progress;
pub mod roadmap;
pub mod step;

// Re-exports for convenience
pub use artifact::{ArtifactContent, ArtifactKind, GeneratedArtifact, Provenance};
pub use challenge::{Challenge, ChallengeKey, ChallengeState};
pub use error::ModelError;
pub use ids::{IdeaId, RecordId, UserId};
pub use idea::{PublicIdea, SavedIdea, SavedIdeaKey};
pub use progress::{completion_percentage, ProgressKey, ProgressRecord};
pub use roadmap::{RoadmapItem, RoadmapKey};
pub use step::ValidationStep;

/// Timestamp type used by every record
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Clarity records
    pub use crate::{
        ArtifactContent, ArtifactKind, Challenge, ChallengeState, GeneratedArtifact, IdeaId,
        ModelError, ProgressRecord, Provenance, RoadmapItem, Timestamp, UserId, ValidationStep,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
