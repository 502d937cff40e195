use serde::{Deserialize, Serialize};

use super::conversation::Conversation;
use super::message::MessageRole;

/// One `{role, content}` pair of the chat history sent upstream
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub content: String,
}

/// Request body for the streaming chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Full history in order, ending with the newest user turn
    pub messages: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Build a request mirroring every message of the conversation
    pub fn from_conversation(conversation: &Conversation) -> Self {
        let messages = conversation
            .messages()
            .iter()
            .map(|m| ChatTurn {
                role: m.role,
                content: m.content.clone(),
            })
            .collect();
        Self { messages }
    }

    /// Build a request from the conversation so far plus a new user turn
    /// that is not (yet) part of it.
    pub fn with_user_turn(conversation: &Conversation, prompt: impl Into<String>) -> Self {
        let mut request = Self::from_conversation(conversation);
        request.messages.push(ChatTurn {
            role: MessageRole::User,
            content: prompt.into(),
        });
        request
    }
}
