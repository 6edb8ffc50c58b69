//! Freshness-windowed cache over the artifact log
//!
//! No single-flight: two concurrent misses for the same (idea, kind) both run
//! their generator and both append. The next read serves whichever row is
//! newest.

use crate::error::ClarityResult;
use clarity_model::{
    ArtifactContent, ArtifactKind, GeneratedArtifact, IdeaId, Provenance, UserId,
};
use clarity_store::{ArtifactStore, Clock};
use std::future::Future;
use std::sync::Arc;

/// Output of a generation closure
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    /// Parsed content
    pub content: ArtifactContent,
    /// Backend tag or fallback marker
    pub provenance: Provenance,
}

/// Answer of [`GenerationCache::get_or_generate`]
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup {
    /// Stored or newly generated artifact
    pub artifact: GeneratedArtifact,
    /// `true` when served from the log without generating
    pub cached: bool,
}

/// Serves fresh artifacts or generates and records new ones
#[derive(Clone)]
pub struct GenerationCache {
    store: Arc<dyn ArtifactStore>,
    clock: Arc<dyn Clock>,
}

impl GenerationCache {
    /// Create cache over `store`
    pub fn new(store: Arc<dyn ArtifactStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Latest artifact younger than `window`, else the result of `generate`
    ///
    /// A failing `generate` persists nothing and its error is returned as is.
    pub async fn get_or_generate<F, Fut>(
        &self,
        idea_id: IdeaId,
        kind: ArtifactKind,
        requested_by: &UserId,
        window: chrono::Duration,
        generate: F,
    ) -> ClarityResult<CacheLookup>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClarityResult<Generated>>,
    {
        let now = self.clock.now();
        if let Some(latest) = self.store.latest(&idea_id, kind).await? {
            if latest.age(now) < window {
                tracing::debug!(idea_id = %idea_id, kind = %kind, "generation cache hit");
                return Ok(CacheLookup {
                    artifact: latest,
                    cached: true,
                });
            }
        }

        tracing::debug!(idea_id = %idea_id, kind = %kind, "generation cache miss");
        let generated = generate().await?;

        let artifact = GeneratedArtifact::new(
            idea_id,
            kind,
            requested_by.clone(),
            generated.content,
            generated.provenance,
            self.clock.now(),
        );
        let stored = self.store.insert(artifact).await?;
        tracing::info!(
            idea_id = %idea_id,
            kind = %kind,
            provenance = %stored.provenance,
            "artifact generated"
        );

        Ok(CacheLookup {
            artifact: stored,
            cached: false,
        })
    }
}

impl std::fmt::Debug for GenerationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationCache").finish_non_exhaustive()
    }
}
