//! Clarity Generation
//!
//! Everything between an idea and the third-party language model:
//! - [`TextGenerator`]: the seam the core calls, returning typed failures
//! - [`prompts`]: per-artifact prompt text and sampling parameters
//! - [`output`]: turning raw completions into [`ArtifactContent`](clarity_model::ArtifactContent)
//! - [`fallback`]: canned content served when the backend is out of quota
//! - [`ChatCompletionsClient`]: OpenAI-compatible HTTP implementation
//!
//! Quota exhaustion is a variant of [`GeneratorError`], decided from the
//! upstream's structured error code. Nothing in this crate inspects message
//! text to classify a failure.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod client;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod output;
pub mod prompts;

// Re-exports for convenience
pub use client::{BackendConfig, ChatCompletionsClient};
pub use error::GeneratorError;
pub use generator::{GenerationRequest, TextGenerator};
pub use prompts::{build_request, GenerationParams};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
