//! The ordered chat log and the streaming accumulator that grows it.

use serde::{Deserialize, Serialize};

use super::message::{Message, MessageRole};

/// Assistant greeting shown at the top of a fresh chat.
pub const GREETING: &str =
    "Hello! I'm your AI financial assistant. How can I help you manage your money better today?";

/// What the accumulator did to the conversation for one delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageUpdate {
    /// A new assistant message with this id was appended
    Created { id: String },
    /// The existing last message with this id got new content
    Appended { id: String },
}

impl MessageUpdate {
    pub fn message_id(&self) -> &str {
        match self {
            MessageUpdate::Created { id } | MessageUpdate::Appended { id } => id,
        }
    }
}

/// Append-only, ordered list of messages.
///
/// Also records the assistant message id of the stream currently writing
/// into the conversation, so a second stream can be refused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
    #[serde(skip)]
    active_stream: Option<String>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a conversation seeded with the assistant greeting
    pub fn with_greeting() -> Self {
        let mut conversation = Self::new();
        conversation
            .messages
            .push(Message::assistant(super::message::new_message_id(), GREETING));
        conversation
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Find a message by id
    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Append a user turn and return it
    pub fn push_user(&mut self, content: impl Into<String>) -> &Message {
        self.messages.push(Message::user(content));
        &self.messages[self.messages.len() - 1]
    }

    /// Claim the conversation for a stream writing to `assistant_message_id`.
    ///
    /// Returns false if another stream already holds it.
    pub fn begin_stream(&mut self, assistant_message_id: &str) -> bool {
        if self.active_stream.is_some() {
            return false;
        }
        self.active_stream = Some(assistant_message_id.to_string());
        true
    }

    /// Release the claim taken by `begin_stream`. Ignored for other ids.
    pub fn end_stream(&mut self, assistant_message_id: &str) {
        if self.active_stream.as_deref() == Some(assistant_message_id) {
            self.active_stream = None;
        }
    }

    /// Id of the assistant message currently being streamed, if any
    pub fn active_stream(&self) -> Option<&str> {
        self.active_stream.as_deref()
    }

    pub fn is_streaming(&self) -> bool {
        self.active_stream.is_some()
    }

    /// Fold the accumulated stream content into the conversation.
    ///
    /// If the last message is the stream's message, its content is replaced
    /// in place; otherwise a new assistant message with that id is appended.
    pub fn apply_assistant_content(
        &mut self,
        assistant_message_id: &str,
        accumulated: &str,
    ) -> MessageUpdate {
        if let Some(last) = self
            .messages
            .last_mut()
            .filter(|m| m.id == assistant_message_id && m.role == MessageRole::Assistant)
        {
            last.content.clear();
            last.content.push_str(accumulated);
            return MessageUpdate::Appended {
                id: assistant_message_id.to_string(),
            };
        }

        self.messages
            .push(Message::assistant(assistant_message_id, accumulated));
        MessageUpdate::Created {
            id: assistant_message_id.to_string(),
        }
    }
}
