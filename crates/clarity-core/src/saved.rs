//! Saved ideas and the public idea wall

use crate::error::{ClarityError, ClarityResult};
use clarity_model::{IdeaId, PublicIdea, SavedIdea, SavedIdeaKey, Timestamp, UserId};
use clarity_store::{Clock, IdeaCatalog, SavedIdeaStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A bookmark joined with its catalog row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedIdeaView {
    /// Catalog row, flattened into the payload
    #[serde(flatten)]
    pub idea: PublicIdea,
    /// When the bookmark was created
    pub saved_at: Timestamp,
}

/// Per-user bookmarks over the public catalog
#[derive(Clone)]
pub struct SavedIdeas {
    store: Arc<dyn SavedIdeaStore>,
    catalog: Arc<dyn IdeaCatalog>,
    clock: Arc<dyn Clock>,
}

impl SavedIdeas {
    /// Create service
    pub fn new(
        store: Arc<dyn SavedIdeaStore>,
        catalog: Arc<dyn IdeaCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            catalog,
            clock,
        }
    }

    /// Bookmark an existing idea; returns `false` if it was already saved
    pub async fn save(&self, user_id: &UserId, idea_id: &IdeaId) -> ClarityResult<bool> {
        if self.catalog.get(idea_id).await?.is_none() {
            return Err(ClarityError::not_found("idea", idea_id));
        }

        let key = SavedIdeaKey::new(user_id.clone(), *idea_id);
        if self.store.find(&key).await?.is_some() {
            return Ok(false);
        }

        match self.store.insert(SavedIdea::new(key, self.clock.now())).await {
            Ok(_) => {
                tracing::info!(user_id = %user_id, idea_id = %idea_id, "idea saved");
                Ok(true)
            }
            Err(err) if err.is_conflict() => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Remove a bookmark; returns whether one existed
    pub async fn unsave(&self, user_id: &UserId, idea_id: &IdeaId) -> ClarityResult<bool> {
        let removed = self
            .store
            .delete(&SavedIdeaKey::new(user_id.clone(), *idea_id))
            .await?;
        if removed {
            tracing::info!(user_id = %user_id, idea_id = %idea_id, "idea unsaved");
        }
        Ok(removed)
    }

    /// Bookmarks of `user_id`, newest first
    ///
    /// Bookmarks whose idea left the catalog are skipped.
    pub async fn list(&self, user_id: &UserId) -> ClarityResult<Vec<SavedIdeaView>> {
        let saved = self.store.list(user_id).await?;
        let mut views = Vec::with_capacity(saved.len());
        for bookmark in saved {
            match self.catalog.get(&bookmark.key.idea_id).await? {
                Some(idea) => views.push(SavedIdeaView {
                    idea,
                    saved_at: bookmark.saved_at,
                }),
                None => tracing::debug!(
                    idea_id = %bookmark.key.idea_id,
                    "saved idea no longer in catalog"
                ),
            }
        }
        Ok(views)
    }

    /// All public ideas by demand score, highest first
    pub async fn idea_wall(&self) -> ClarityResult<Vec<PublicIdea>> {
        Ok(self.catalog.list_by_demand().await?)
    }
}

impl std::fmt::Debug for SavedIdeas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedIdeas").finish_non_exhaustive()
    }
}
