//! Mock provider implementation for tests and offline runs.

use super::{GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// What the mock answers with.
#[derive(Debug, Clone)]
enum Reply {
    /// Echo a short acknowledgement of the prompt.
    Echo,
    Fixed(String),
    Empty,
    Fail(String),
}

/// A prompt/instruction pair as seen by the provider.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub system_instruction: Option<String>,
}

/// Mock text provider that records every call.
pub struct MockTextProvider {
    reply: Reply,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTextProvider {
    pub fn new() -> Self {
        Self::with_reply(Reply::Echo)
    }

    /// Always answer with `text`.
    pub fn fixed(text: impl Into<String>) -> Self {
        Self::with_reply(Reply::Fixed(text.into()))
    }

    /// Answer without any text part, as a model does when it produces nothing.
    pub fn empty() -> Self {
        Self::with_reply(Reply::Empty)
    }

    /// Fail every call with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Reply::Fail(message.into()))
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }
}

impl Default for MockTextProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                prompt: prompt.to_string(),
                system_instruction: params.system_instruction.clone(),
            });
        }

        let text = match &self.reply {
            Reply::Echo => Some(format!(
                "Mock response for a {}-character prompt",
                prompt.chars().count()
            )),
            Reply::Fixed(text) => Some(text.clone()),
            Reply::Empty => None,
            Reply::Fail(message) => return Err(ProviderError::ApiError(message.clone())),
        };

        Ok(ProviderResponse { text })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
