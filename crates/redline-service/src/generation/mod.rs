//! Generation collaborator integration.
//!
//! The generation backend is handed a prompt and a requested output shape
//! and returns free text that is *expected* to parse as JSON. Parsing and
//! the malformed-output policy live in `redline_core::review`; this module
//! only moves bytes, with a bounded timeout. A timed-out call is treated
//! by the pipelines exactly like a malformed response.

pub mod client;
pub mod prompts;

use async_trait::async_trait;

pub use client::{AnthropicClient, GenerationError};

/// Behavioral contract of the external generation collaborator.
///
/// Both methods return the model's raw text; callers own parsing and
/// recovery. Tests substitute this trait to exercise the pipelines with
/// canned (or deliberately malformed) output.
#[async_trait]
pub trait ReviewGenerator: Send + Sync {
    /// Produce the quick assessment for the free tier.
    async fn score_document(&self, text: &str) -> Result<String, GenerationError>;

    /// Produce the full structured rewrite for the paid tier.
    async fn rewrite_document(&self, text: &str) -> Result<String, GenerationError>;
}
