//! Chat-completion provider abstraction used by the ask endpoint.
//!
//! `OpenAiProvider` talks to any OpenAI-compatible `/chat/completions`
//! endpoint; `MockChatProvider` answers locally for tests.

pub mod mock;
pub mod openai;

pub use mock::MockChatProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Empty response")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Result of a completion call.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub text: String,
    pub model: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider label used in logs.
    fn name(&self) -> &'static str;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, ProviderError>;
}
