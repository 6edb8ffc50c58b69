//! Request boundary
//!
//! [`ClarityService`] is the only entry point taking raw input. It receives a
//! user id already resolved by the identity layer, parses every argument
//! before touching a store, and converts failures into [`ErrorPayload`]s.

use crate::api::{
    Ack, ChallengeStartResponse, ChallengeStatusResponse, GenerationResponse, IdeaRequest,
    IdeaWallResponse, MarkStepRequest, MarkStepResponse, ProgressResponse, RoadmapResponse,
    RoadmapUpdateRequest, SaveIdeaResponse, SavedIdeasResponse, UnsaveIdeaResponse,
};
use crate::artifacts::ArtifactService;
use crate::challenge::{ChallengeEvaluator, ChallengeStatus};
use crate::config::ClarityConfig;
use crate::error::{ClarityResult, ErrorPayload};
use crate::generation_cache::GenerationCache;
use crate::progress::ProgressTracker;
use crate::roadmap::RoadmapTracker;
use crate::saved::SavedIdeas;
use clarity_generation::TextGenerator;
use clarity_model::{ArtifactKind, IdeaId, UserId, ValidationStep};
use clarity_store::{
    ArtifactStore, CachedCatalog, ChallengeStore, Clock, IdeaCatalog, InMemoryArtifactStore,
    InMemoryChallengeStore, InMemoryProgressStore, InMemoryRoadmapStore, InMemorySavedIdeaStore,
    ProgressStore, RoadmapStore, SavedIdeaStore,
};
use std::str::FromStr;
use std::sync::Arc;

/// Collaborators the service is assembled from
#[derive(Clone)]
pub struct ServiceDeps {
    /// Validation step records
    pub progress: Arc<dyn ProgressStore>,
    /// Challenge records
    pub challenges: Arc<dyn ChallengeStore>,
    /// Roadmap items
    pub roadmap: Arc<dyn RoadmapStore>,
    /// Generated artifact log
    pub artifacts: Arc<dyn ArtifactStore>,
    /// Bookmarks
    pub saved: Arc<dyn SavedIdeaStore>,
    /// Public idea feed
    pub catalog: Arc<dyn IdeaCatalog>,
    /// Text generation backend
    pub generator: Arc<dyn TextGenerator>,
    /// Time source
    pub clock: Arc<dyn Clock>,
}

impl ServiceDeps {
    /// In-memory stores around the given catalog, generator and clock
    pub fn in_memory(
        catalog: Arc<dyn IdeaCatalog>,
        generator: Arc<dyn TextGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            progress: Arc::new(InMemoryProgressStore::new()),
            challenges: Arc::new(InMemoryChallengeStore::new()),
            roadmap: Arc::new(InMemoryRoadmapStore::new()),
            artifacts: Arc::new(InMemoryArtifactStore::new()),
            saved: Arc::new(InMemorySavedIdeaStore::new()),
            catalog,
            generator,
            clock,
        }
    }
}

/// Validation backend facade
#[derive(Clone)]
pub struct ClarityService {
    progress: ProgressTracker,
    challenges: ChallengeEvaluator,
    roadmap: RoadmapTracker,
    artifacts: ArtifactService,
    saved: SavedIdeas,
}

impl ClarityService {
    /// Assemble the service
    #[must_use]
    pub fn new(deps: ServiceDeps, config: &ClarityConfig) -> Self {
        let catalog: Arc<dyn IdeaCatalog> = Arc::new(CachedCatalog::new(
            deps.catalog,
            config.catalog_cache.max_capacity,
            config.catalog_cache.ttl(),
        ));
        let progress = ProgressTracker::new(deps.progress, deps.clock.clone());

        Self {
            challenges: ChallengeEvaluator::new(
                deps.challenges,
                progress.clone(),
                deps.clock.clone(),
                config.challenge_rules(),
            ),
            roadmap: RoadmapTracker::new(deps.roadmap, deps.clock.clone()),
            artifacts: ArtifactService::new(
                catalog.clone(),
                GenerationCache::new(deps.artifacts, deps.clock.clone()),
                deps.generator,
                config.freshness,
                config.generation_timeout(),
            ),
            saved: SavedIdeas::new(deps.saved, catalog, deps.clock),
            progress,
        }
    }

    /// Progress tracker
    #[inline]
    #[must_use]
    pub fn progress_tracker(&self) -> &ProgressTracker {
        &self.progress
    }

    /// Challenge evaluator
    #[inline]
    #[must_use]
    pub fn challenge_evaluator(&self) -> &ChallengeEvaluator {
        &self.challenges
    }

    /// Mark a validation step completed
    pub async fn mark_step(
        &self,
        user_id: &str,
        request: MarkStepRequest,
    ) -> Result<MarkStepResponse, ErrorPayload> {
        respond("mark_step", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(&request.idea_id)?;
            let step = ValidationStep::from_str(&request.step)?;
            let progress = self.progress.mark_completed(&user, &idea, step).await?;
            Ok(MarkStepResponse {
                success: true,
                message: "Step marked as completed".to_string(),
                progress,
            })
        })
        .await
    }

    /// Current validation progress
    pub async fn progress(
        &self,
        user_id: &str,
        idea_id: &str,
    ) -> Result<ProgressResponse, ErrorPayload> {
        respond("progress", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(idea_id)?;
            Ok(ProgressResponse {
                progress: self.progress.snapshot(&user, &idea).await?,
            })
        })
        .await
    }

    /// Start the 48-hour challenge
    pub async fn start_challenge(
        &self,
        user_id: &str,
        request: IdeaRequest,
    ) -> Result<ChallengeStartResponse, ErrorPayload> {
        respond("start_challenge", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(&request.idea_id)?;
            let outcome = self.challenges.start(&user, &idea).await?;
            let message = if outcome.newly_started {
                "48-hour challenge started!"
            } else {
                "Challenge already started for this idea"
            };
            Ok(ChallengeStartResponse {
                success: outcome.newly_started,
                message: message.to_string(),
                challenge: outcome.view,
            })
        })
        .await
    }

    /// Challenge status; may record completion
    pub async fn challenge_status(
        &self,
        user_id: &str,
        idea_id: &str,
    ) -> Result<ChallengeStatusResponse, ErrorPayload> {
        respond("challenge_status", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(idea_id)?;
            Ok(match self.challenges.status(&user, &idea).await? {
                ChallengeStatus::NotStarted => ChallengeStatusResponse {
                    challenge_started: false,
                    challenge: None,
                    message: Some("No challenge started for this idea".to_string()),
                },
                ChallengeStatus::Started(view) => ChallengeStatusResponse {
                    challenge_started: true,
                    challenge: Some(view),
                    message: None,
                },
            })
        })
        .await
    }

    /// Upsert a roadmap step
    pub async fn update_roadmap(
        &self,
        user_id: &str,
        request: RoadmapUpdateRequest,
    ) -> Result<Ack, ErrorPayload> {
        respond("update_roadmap", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(&request.idea_id)?;
            self.roadmap.update(&user, &idea, request.change()).await?;
            Ok(Ack {
                success: true,
                message: "Roadmap step updated successfully".to_string(),
            })
        })
        .await
    }

    /// Roadmap with summary
    pub async fn roadmap(
        &self,
        user_id: &str,
        idea_id: &str,
    ) -> Result<RoadmapResponse, ErrorPayload> {
        respond("roadmap", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(idea_id)?;
            let overview = self.roadmap.list(&user, &idea).await?;
            Ok(RoadmapResponse {
                roadmap: overview.items.into_iter().map(Into::into).collect(),
                summary: overview.summary,
            })
        })
        .await
    }

    /// Generate (or serve cached) artifact of `kind`
    pub async fn generate(
        &self,
        user_id: &str,
        idea_id: &str,
        kind: ArtifactKind,
    ) -> Result<GenerationResponse, ErrorPayload> {
        respond("generate", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(idea_id)?;
            Ok(self.artifacts.generate(&user, &idea, kind).await?.into())
        })
        .await
    }

    /// Bookmark an idea
    pub async fn save_idea(
        &self,
        user_id: &str,
        request: IdeaRequest,
    ) -> Result<SaveIdeaResponse, ErrorPayload> {
        respond("save_idea", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(&request.idea_id)?;
            let saved = self.saved.save(&user, &idea).await?;
            let message = if saved {
                "Idea saved successfully"
            } else {
                "Idea already saved"
            };
            Ok(SaveIdeaResponse {
                success: true,
                message: message.to_string(),
                saved,
            })
        })
        .await
    }

    /// Remove a bookmark
    pub async fn unsave_idea(
        &self,
        user_id: &str,
        idea_id: &str,
    ) -> Result<UnsaveIdeaResponse, ErrorPayload> {
        respond("unsave_idea", async {
            let user = UserId::new(user_id)?;
            let idea = IdeaId::parse(idea_id)?;
            let removed = self.saved.unsave(&user, &idea).await?;
            let message = if removed {
                "Idea unsaved successfully"
            } else {
                "Idea was not saved"
            };
            Ok(UnsaveIdeaResponse {
                success: true,
                message: message.to_string(),
                removed,
            })
        })
        .await
    }

    /// Bookmarks, newest first
    pub async fn saved_ideas(&self, user_id: &str) -> Result<SavedIdeasResponse, ErrorPayload> {
        respond("saved_ideas", async {
            let user = UserId::new(user_id)?;
            let ideas = self.saved.list(&user).await?;
            Ok(SavedIdeasResponse {
                count: ideas.len(),
                ideas,
            })
        })
        .await
    }

    /// Public ideas by demand
    pub async fn idea_wall(&self) -> Result<IdeaWallResponse, ErrorPayload> {
        respond("idea_wall", async {
            let ideas = self.saved.idea_wall().await?;
            Ok(IdeaWallResponse {
                count: ideas.len(),
                ideas,
            })
        })
        .await
    }
}

impl std::fmt::Debug for ClarityService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClarityService")
            .field("challenges", &self.challenges)
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

async fn respond<T>(
    operation: &'static str,
    work: impl std::future::Future<Output = ClarityResult<T>>,
) -> Result<T, ErrorPayload> {
    work.await.map_err(|err| {
        if err.is_retryable() {
            tracing::warn!(
                operation = operation,
                kind = %err.kind(),
                error = %err,
                "request failed"
            );
        } else {
            tracing::debug!(
                operation = operation,
                kind = %err.kind(),
                error = %err,
                "request rejected"
            );
        }
        ErrorPayload::from(err)
    })
}
