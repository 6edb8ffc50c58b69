//! Public idea catalog
//!
//! The catalog is reference data owned by another system. [`CachedCatalog`]
//! puts a bounded, time-limited `moka` cache in front of any implementation so
//! that every generation and save request does not re-read the same rows.

use crate::error::StoreResult;
use async_trait::async_trait;
use clarity_model::{IdeaId, PublicIdea};
use dashmap::DashMap;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Read-only access to public ideas
#[async_trait]
pub trait IdeaCatalog: Send + Sync {
    /// Look up one idea
    async fn get(&self, id: &IdeaId) -> StoreResult<Option<PublicIdea>>;

    /// Every idea ordered by stored demand score, highest first
    async fn list_by_demand(&self) -> StoreResult<Vec<PublicIdea>>;
}

/// Catalog held in memory, seeded by the caller
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    ideas: DashMap<IdeaId, PublicIdea>,
}

impl InMemoryCatalog {
    /// Create empty catalog
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create catalog from seed rows
    #[must_use]
    pub fn with_ideas(ideas: impl IntoIterator<Item = PublicIdea>) -> Self {
        let catalog = Self::new();
        for idea in ideas {
            catalog.upsert(idea);
        }
        catalog
    }

    /// Insert or replace a row
    pub fn upsert(&self, idea: PublicIdea) {
        self.ideas.insert(idea.id, idea);
    }
}

#[async_trait]
impl IdeaCatalog for InMemoryCatalog {
    async fn get(&self, id: &IdeaId) -> StoreResult<Option<PublicIdea>> {
        Ok(self.ideas.get(id).map(|i| i.value().clone()))
    }

    async fn list_by_demand(&self) -> StoreResult<Vec<PublicIdea>> {
        let mut ideas: Vec<PublicIdea> = self.ideas.iter().map(|i| i.value().clone()).collect();
        ideas.sort_by(|a, b| {
            b.demand_score
                .cmp(&a.demand_score)
                .then_with(|| a.title.cmp(&b.title))
        });
        Ok(ideas)
    }
}

/// Statistics for cache performance monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogCacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Catalog decorator caching point lookups
///
/// Only hits are cached: an idea missing now may be published later.
/// Listings always go to the inner catalog.
#[derive(Clone)]
pub struct CachedCatalog {
    inner: Arc<dyn IdeaCatalog>,
    cache: Cache<IdeaId, PublicIdea>,
}

impl CachedCatalog {
    /// Wrap `inner` with a cache of `max_capacity` entries living `ttl`
    #[must_use]
    pub fn new(inner: Arc<dyn IdeaCatalog>, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Drop a cached row, e.g. after the catalog was edited
    pub async fn invalidate(&self, id: &IdeaId) {
        self.cache.invalidate(id).await;
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CatalogCacheStats {
        CatalogCacheStats {
            entry_count: self.cache.entry_count(),
        }
    }
}

impl std::fmt::Debug for CachedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCatalog")
            .field("entry_count", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdeaCatalog for CachedCatalog {
    async fn get(&self, id: &IdeaId) -> StoreResult<Option<PublicIdea>> {
        if let Some(hit) = self.cache.get(id).await {
            tracing::trace!(idea_id = %id, "catalog cache hit");
            return Ok(Some(hit));
        }

        let found = self.inner.get(id).await?;
        if let Some(idea) = &found {
            self.cache.insert(*id, idea.clone()).await;
        }
        Ok(found)
    }

    async fn list_by_demand(&self) -> StoreResult<Vec<PublicIdea>> {
        self.inner.list_by_demand().await
    }
}
