//! Clarity Store Layer
//!
//! Contracts between the progress core and whatever persists its records.
//!
//! # Contracts
//!
//! Every store exposes the same three primitives over its own unique key:
//! - `find(key)`: point lookup
//! - `insert(record)`: create, failing with [`StoreError::Conflict`] when the key exists
//! - `update(id, change)`: mutate an existing row in place
//!
//! Uniqueness is the store's job. Callers do check-then-act and treat a
//! `Conflict` as "somebody else won the race", never as a hard failure.
//!
//! # Architecture
//!
//! ```text
//! ProgressTracker ─┐
//! ChallengeEvaluator ─┼─► ProgressStore / ChallengeStore / RoadmapStore
//! RoadmapTracker ──┘          │
//! GenerationCache ───────► ArtifactStore
//! SavedIdeas ────────────► SavedIdeaStore + IdeaCatalog ◄── CachedCatalog (moka)
//! ```
//!
//! The in-memory implementations in [`memory`] back tests, the demo binary and
//! single-process deployments.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod clock;
pub mod error;
pub mod memory;
pub mod traits;

// Re-exports for convenience
pub use catalog::{CachedCatalog, CatalogCacheStats, IdeaCatalog, InMemoryCatalog};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StoreError, StoreResult};
pub use memory::{
    InMemoryArtifactStore, InMemoryChallengeStore, InMemoryProgressStore, InMemoryRoadmapStore,
    InMemorySavedIdeaStore,
};
pub use traits::{
    ArtifactStore, ChallengeStore, ChallengeUpdate, ProgressStore, ProgressUpdate, RoadmapStore,
    RoadmapUpdate, SavedIdeaStore,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
