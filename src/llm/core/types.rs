//! Request types for the upstream completion API

use serde::{Deserialize, Serialize};

use super::config::GenerationConfig;
use crate::models::Message;

/// Outbound chat-completion payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    /// Conversation history, system persona first
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Build a request with `system` prepended to the caller's transcript
    pub fn with_system(system: Message, transcript: &[Message], config: &GenerationConfig) -> Self {
        let mut messages = Vec::with_capacity(transcript.len() + 1);
        messages.push(system);
        messages.extend_from_slice(transcript);

        Self {
            model: config.model.clone(),
            messages,
            max_tokens: config.max_tokens,
        }
    }
}
