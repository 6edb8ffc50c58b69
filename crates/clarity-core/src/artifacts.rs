//! Cached generation of marketing artifacts for public ideas

use crate::config::FreshnessConfig;
use crate::error::{ClarityError, ClarityResult};
use crate::generation_cache::{Generated, GenerationCache};
use clarity_generation::{build_request, fallback, output, GeneratorError, TextGenerator};
use clarity_model::{ArtifactContent, ArtifactKind, IdeaId, Provenance, PublicIdea, UserId};
use clarity_store::IdeaCatalog;
use std::sync::Arc;
use std::time::Duration;

/// Result of [`ArtifactService::generate`]
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactResponse {
    /// Requested kind
    pub kind: ArtifactKind,
    /// Generated or fallback content
    pub content: ArtifactContent,
    /// Served from the log without generating
    pub cached: bool,
    /// Content is canned fallback, not generated
    pub mock: bool,
    /// Explanation attached to fallback content
    pub message: Option<String>,
}

/// Produces tweets, competitor lists, landing-page prompts and surveys
#[derive(Clone)]
pub struct ArtifactService {
    catalog: Arc<dyn IdeaCatalog>,
    cache: GenerationCache,
    generator: Arc<dyn TextGenerator>,
    freshness: FreshnessConfig,
    timeout: Duration,
}

impl ArtifactService {
    /// Create service
    pub fn new(
        catalog: Arc<dyn IdeaCatalog>,
        cache: GenerationCache,
        generator: Arc<dyn TextGenerator>,
        freshness: FreshnessConfig,
        timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            cache,
            generator,
            freshness,
            timeout,
        }
    }

    /// Serve a fresh `kind` artifact for `idea_id`, generating one if needed
    pub async fn generate(
        &self,
        user_id: &UserId,
        idea_id: &IdeaId,
        kind: ArtifactKind,
    ) -> ClarityResult<ArtifactResponse> {
        let idea = self
            .catalog
            .get(idea_id)
            .await?
            .ok_or_else(|| ClarityError::not_found("idea", idea_id))?;

        let lookup = self
            .cache
            .get_or_generate(idea.id, kind, user_id, self.freshness.window(kind), || {
                self.produce(kind, &idea)
            })
            .await?;

        let mock = lookup.artifact.provenance.is_fallback();
        Ok(ArtifactResponse {
            kind,
            content: lookup.artifact.content,
            cached: lookup.cached,
            mock,
            message: mock.then(|| fallback::quota_message(kind)),
        })
    }

    async fn produce(&self, kind: ArtifactKind, idea: &PublicIdea) -> ClarityResult<Generated> {
        let request = build_request(kind, idea);
        let outcome = tokio::time::timeout(self.timeout, self.generator.generate(&request))
            .await
            .unwrap_or(Err(GeneratorError::Timeout(self.timeout)));

        match outcome {
            Ok(raw) => {
                let content = output::parse(kind, &raw).map_err(|err| {
                    tracing::warn!(
                        idea_id = %idea.id,
                        kind = %kind,
                        error = %err,
                        "unusable completion"
                    );
                    ClarityError::from(err)
                })?;
                Ok(Generated {
                    content,
                    provenance: Provenance::backend(self.generator.backend_tag()),
                })
            }
            Err(err) if err.is_quota_exhausted() => {
                tracing::info!(
                    idea_id = %idea.id,
                    kind = %kind,
                    "generation quota exhausted, serving fallback content"
                );
                Ok(Generated {
                    content: fallback::content_for(kind, idea),
                    provenance: Provenance::Fallback,
                })
            }
            Err(err) if err.is_retryable() => {
                tracing::warn!(
                    idea_id = %idea.id,
                    kind = %kind,
                    error = %err,
                    "generation failed, backend may recover"
                );
                Err(err.into())
            }
            Err(err) => {
                tracing::error!(
                    idea_id = %idea.id,
                    kind = %kind,
                    error = %err,
                    "generation rejected by backend"
                );
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for ArtifactService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactService")
            .field("backend", &self.generator.backend_tag())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
