//! Language-model provider abstractions and implementations.
//!
//! Handlers depend on the `TextProvider` trait so the Gemini backend can be
//! swapped for the in-process mock.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::{GeminiConfig, GeminiTextProvider};
pub use mock::MockTextProvider;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("{0}")]
    ApiError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Content filtered")]
    ContentFiltered,

    #[error("{0}")]
    NetworkError(String),
}

/// Result of a single generation call.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    /// Generated text; `None` when the model returned no text part.
    pub text: Option<String>,
}

/// Generation parameters for one request.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Persona / behaviour instruction sent alongside the prompt.
    pub system_instruction: Option<String>,
}

impl GenerationParams {
    pub fn with_system_instruction(instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: Some(instruction.into()),
        }
    }
}

/// Single-turn, non-streaming text generation.
#[async_trait]
pub trait TextProvider: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    async fn health_check(&self) -> Result<(), ProviderError>;
}
