//! Service configuration
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! [challenge]
//! duration_hours = 48
//! required_steps = 3
//!
//! [freshness]
//! tweet_secs = 3600
//!
//! [generation]
//! model = "gpt-4o-mini"
//! timeout_secs = 30
//! ```

use crate::challenge::ChallengeRules;
use clarity_generation::BackendConfig;
use clarity_model::{ArtifactKind, ValidationStep};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest accepted challenge window, one year
pub const MAX_CHALLENGE_HOURS: u32 = 24 * 365;

/// Longest accepted artifact freshness window, one year
pub const MAX_FRESHNESS_SECS: u64 = 365 * 24 * 3600;

/// Configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },

    /// TOML did not match the schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values parsed but are inconsistent
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClarityConfig {
    /// Challenge rules
    pub challenge: ChallengeConfig,
    /// Per-kind artifact freshness windows
    pub freshness: FreshnessConfig,
    /// Generation backend
    pub generation: BackendConfig,
    /// Catalog lookup cache
    pub catalog_cache: CatalogCacheConfig,
}

impl ClarityConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_toml_str(&text)?.with_env_overrides())
    }

    /// Apply environment overrides (API key)
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.generation = self.generation.with_env_overrides();
        self
    }

    /// With challenge duration
    #[inline]
    #[must_use]
    pub fn with_challenge_hours(mut self, hours: u32) -> Self {
        self.challenge.duration_hours = hours;
        self
    }

    /// With required step count
    #[inline]
    #[must_use]
    pub fn with_required_steps(mut self, steps: usize) -> Self {
        self.challenge.required_steps = steps;
        self
    }

    /// With generation backend
    #[inline]
    #[must_use]
    pub fn with_generation(mut self, generation: BackendConfig) -> Self {
        self.generation = generation;
        self
    }

    /// With freshness window for one kind
    #[must_use]
    pub fn with_freshness(mut self, kind: ArtifactKind, secs: u64) -> Self {
        *self.freshness.secs_mut(kind) = secs;
        self
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_CHALLENGE_HOURS).contains(&self.challenge.duration_hours) {
            return Err(ConfigError::Invalid(format!(
                "challenge.duration_hours must be between 1 and {MAX_CHALLENGE_HOURS}"
            )));
        }
        if !(1..=ValidationStep::COUNT).contains(&self.challenge.required_steps) {
            return Err(ConfigError::Invalid(format!(
                "challenge.required_steps must be between 1 and {}",
                ValidationStep::COUNT
            )));
        }
        if let Some(kind) = ArtifactKind::ALL
            .into_iter()
            .find(|kind| self.freshness.secs(*kind) > MAX_FRESHNESS_SECS)
        {
            return Err(ConfigError::Invalid(format!(
                "freshness window for {kind} exceeds {MAX_FRESHNESS_SECS} seconds"
            )));
        }
        if self.generation.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "generation.timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Challenge rules derived from this configuration
    #[must_use]
    pub fn challenge_rules(&self) -> ChallengeRules {
        ChallengeRules::new(
            chrono::Duration::hours(i64::from(self.challenge.duration_hours)),
            self.challenge.required_steps,
        )
    }

    /// Bound on one generation call
    #[inline]
    #[must_use]
    pub fn generation_timeout(&self) -> Duration {
        self.generation.timeout()
    }
}

/// Challenge section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChallengeConfig {
    /// Length of the challenge window
    pub duration_hours: u32,
    /// Completed steps needed for success
    pub required_steps: usize,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            duration_hours: 48,
            required_steps: 3,
        }
    }
}

/// Freshness section, seconds per artifact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessConfig {
    /// Tweet window
    pub tweet_secs: u64,
    /// Competitor analysis window
    pub competitors_secs: u64,
    /// Landing page copy window
    pub landing_page_secs: u64,
    /// Survey window
    pub survey_secs: u64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            tweet_secs: 3600,
            competitors_secs: 7200,
            landing_page_secs: 7200,
            survey_secs: 7200,
        }
    }
}

impl FreshnessConfig {
    /// Window during which a stored artifact of `kind` is served
    ///
    /// Values too large for a `chrono::Duration` saturate at its maximum.
    #[must_use]
    pub fn window(&self, kind: ArtifactKind) -> chrono::Duration {
        i64::try_from(self.secs(kind))
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    fn secs(&self, kind: ArtifactKind) -> u64 {
        match kind {
            ArtifactKind::Tweet => self.tweet_secs,
            ArtifactKind::Competitors => self.competitors_secs,
            ArtifactKind::LandingPage => self.landing_page_secs,
            ArtifactKind::Survey => self.survey_secs,
        }
    }

    fn secs_mut(&mut self, kind: ArtifactKind) -> &mut u64 {
        match kind {
            ArtifactKind::Tweet => &mut self.tweet_secs,
            ArtifactKind::Competitors => &mut self.competitors_secs,
            ArtifactKind::LandingPage => &mut self.landing_page_secs,
            ArtifactKind::Survey => &mut self.survey_secs,
        }
    }
}

/// Catalog cache section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogCacheConfig {
    /// Maximum cached ideas
    pub max_capacity: u64,
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
}

impl Default for CatalogCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            ttl_secs: 300,
        }
    }
}

impl CatalogCacheConfig {
    /// Entry lifetime
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}
