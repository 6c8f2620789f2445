//! Mock provider for tests and local development without an API key.

use super::{ChatCompletion, ChatMessage, ChatProvider, ProviderError, Role};
use async_trait::async_trait;
use std::sync::Mutex;

/// Answers with a fixed reply and remembers the last conversation it saw.
pub struct MockChatProvider {
    reply: Result<String, String>,
    last_messages: Mutex<Vec<ChatMessage>>,
}

impl MockChatProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every call fails with an API error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            last_messages: Mutex::new(Vec::new()),
        }
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.last_messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, ProviderError> {
        if let Ok(mut last) = self.last_messages.lock() {
            *last = messages.to_vec();
        }

        let text = self.reply.clone().map_err(ProviderError::ApiError)?;
        let input_chars: usize = messages
            .iter()
            .filter(|m| m.role != Role::Assistant)
            .map(|m| m.content.len())
            .sum();

        Ok(ChatCompletion {
            text,
            model: "mock".to_string(),
            input_tokens: (input_chars / 4) as u32,
            output_tokens: 10,
        })
    }
}
