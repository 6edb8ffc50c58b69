//! Error types for store operations

/// Result alias for store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by a store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Unique key already taken, or a write-once field already written
    #[error("conflict on {entity} {key}")]
    Conflict {
        /// Kind of record
        entity: &'static str,
        /// Contended key
        key: String,
    },

    /// Row addressed by id does not exist
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Missing identifier
        id: String,
    },

    /// Backend could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create conflict error
    pub fn conflict(entity: &'static str, key: impl std::fmt::Debug) -> Self {
        Self::Conflict {
            entity,
            key: format!("{key:?}"),
        }
    }

    /// Create not-found error
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Check if this is a uniqueness/write-once conflict
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if the caller may retry with backoff
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Conflict { .. })
    }
}
