//! The five fixed validation steps

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A fixed-purpose validation task a user can complete for an idea
///
/// Closed set. Declaration order is the order steps are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStep {
    /// Landing page published
    Landing,
    /// Feedback tweet posted
    Tweet,
    /// Competitor analysis reviewed
    Competitor,
    /// Community discussion started
    Discussion,
    /// Survey sent out
    Survey,
}

impl ValidationStep {
    /// Every step, in reporting order
    pub const ALL: [ValidationStep; 5] = [
        ValidationStep::Landing,
        ValidationStep::Tweet,
        ValidationStep::Competitor,
        ValidationStep::Discussion,
        ValidationStep::Survey,
    ];

    /// Number of steps in the closed set
    pub const COUNT: usize = Self::ALL.len();

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStep::Landing => "landing",
            ValidationStep::Tweet => "tweet",
            ValidationStep::Competitor => "competitor",
            ValidationStep::Discussion => "discussion",
            ValidationStep::Survey => "survey",
        }
    }
}

impl FromStr for ValidationStep {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| ModelError::invalid_step(s))
    }
}

impl fmt::Display for ValidationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
