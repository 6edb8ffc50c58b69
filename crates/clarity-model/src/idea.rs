//! Public catalog ideas and per-user bookmarks

use crate::ids::{IdeaId, RecordId, UserId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Read-only idea from the public feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdea {
    /// Record identifier
    pub id: IdeaId,
    /// Display title
    pub title: String,
    /// Short problem statement
    #[serde(default)]
    pub problem_summary: Option<String>,
    /// Longer pitch
    #[serde(default)]
    pub description: Option<String>,
    /// Market or category
    #[serde(default)]
    pub domain: Option<String>,
    /// Free-form difficulty label
    #[serde(default)]
    pub difficulty: Option<String>,
    /// Stored ranking score; computed elsewhere
    #[serde(default)]
    pub demand_score: i32,
}

impl PublicIdea {
    /// Minimal idea with a title
    pub fn new(id: IdeaId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            problem_summary: None,
            description: None,
            domain: None,
            difficulty: None,
            demand_score: 0,
        }
    }

    /// With problem summary
    #[must_use]
    pub fn with_problem(mut self, problem: impl Into<String>) -> Self {
        self.problem_summary = Some(problem.into());
        self
    }

    /// With description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// With demand score
    #[must_use]
    pub fn with_demand_score(mut self, score: i32) -> Self {
        self.demand_score = score;
        self
    }

    /// The best available description of the problem the idea solves
    #[must_use]
    pub fn problem_statement(&self) -> String {
        self.problem_summary
            .as_deref()
            .or(self.description.as_deref())
            .map_or_else(|| format!("Innovative solution for {}", self.title), str::to_string)
    }
}

/// Unique key of a bookmark
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SavedIdeaKey {
    /// Owning user
    pub user_id: UserId,
    /// Idea
    pub idea_id: IdeaId,
}

impl SavedIdeaKey {
    /// Create key
    #[inline]
    #[must_use]
    pub fn new(user_id: UserId, idea_id: IdeaId) -> Self {
        Self { user_id, idea_id }
    }
}

/// A user's bookmark of a public idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedIdea {
    /// Record identifier
    pub id: RecordId,
    /// One bookmark per (user, idea)
    pub key: SavedIdeaKey,
    /// When the bookmark was created
    pub saved_at: Timestamp,
}

impl SavedIdea {
    /// Bookmark created at `now`
    #[must_use]
    pub fn new(key: SavedIdeaKey, now: Timestamp) -> Self {
        Self {
            id: RecordId::new(),
            key,
            saved_at: now,
        }
    }
}
