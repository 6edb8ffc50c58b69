//! Identifier newtypes
//!
//! Identity is always passed explicitly; these wrappers make sure a raw string
//! never reaches a store without having been validated first.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Authenticated user identifier
///
/// Opaque to this subsystem: whatever the identity layer resolved from the
/// bearer token. The only invariant is that it is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a resolved user identifier
    ///
    /// # Errors
    /// Returns [`ModelError::EmptyUserId`] for empty or whitespace-only input.
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ModelError::EmptyUserId);
        }
        Ok(Self(value))
    }

    /// Borrow the raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public idea identifier (UUID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdeaId(pub Uuid);

impl IdeaId {
    /// Parse an idea identifier from request input
    ///
    /// # Errors
    /// Returns [`ModelError::InvalidIdeaId`] when the input is not a UUID.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| ModelError::invalid_idea_id(value))
    }

    /// Generate a fresh idea id
    #[inline]
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Store-assigned row identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generate new record ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_id_rejects_blank() {
        assert_eq!(UserId::new(""), Err(ModelError::EmptyUserId));
        assert_eq!(UserId::new("   "), Err(ModelError::EmptyUserId));
        assert!(UserId::new("a1b2").is_ok());
    }

    #[test]
    fn user_id_deserialize_validates() {
        let ok: Result<UserId, _> = serde_json::from_str("\"abc\"");
        assert!(ok.is_ok());
        let bad: Result<UserId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn idea_id_parse() {
        let id = IdeaId::parse("7f1c0a2e-8a4b-4c1e-9f55-2d3b6c7e8a90").unwrap();
        assert_eq!(id.to_string(), "7f1c0a2e-8a4b-4c1e-9f55-2d3b6c7e8a90");

        let err = IdeaId::parse("not-a-uuid").unwrap_err();
        assert!(matches!(err, ModelError::InvalidIdeaId { .. }));
    }

    #[test]
    fn record_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }
}
