//! Upstream generation providers.
//!
//! The gateway talks to the upstream through [`GenerationClient`], so tests
//! can swap the network for an in-process fake.

pub mod gemini;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::StatusCode;
use secrecy::Secret;
use serde_json::Value;
use thiserror::Error;

/// Error type for provider operations. Upstream HTTP errors are not errors
/// here: they come back as an [`UpstreamReply`] with a non-success status.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Failed to read upstream response: {0}")]
    ResponseRead(String),
}

/// Raw upstream outcome: status plus the unparsed body.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Generation configuration sent alongside the prompt.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    /// Server-side enforced output shape; free-form JSON mode when `None`.
    pub response_schema: Option<Value>,
}

/// Trait for generation endpoints that turn one prompt into one reply.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Issue exactly one generation call.
    async fn generate(
        &self,
        credential: &Secret<String>,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<UpstreamReply, ProviderError>;
}
