//! Chat request and streaming error types.
//!
//! This module defines the failures a caller of the chat transport can
//! observe. Decode retries inside the assembler are recovered locally and
//! never show up here.

use std::fmt;

use crate::assembler::AbortReason;
use crate::traits::HttpError;

/// Errors reported by [`ChatClient`](crate::client::ChatClient) and
/// [`ChatController`](crate::chat::ChatController).
#[derive(Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Backend answered 429. No session was opened.
    RateLimited,

    /// Backend answered 402. No session was opened.
    ServiceUnavailable,

    /// Request failed, returned a non-success status, or had no body.
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Stream stopped early. Content received so far is kept.
    StreamAborted {
        reason: AbortReason,
        message: String,
    },

    /// A reply is already streaming into this conversation.
    Busy,

    /// The prompt was empty or whitespace.
    EmptyPrompt,
}

impl ChatError {
    /// Build a transport error for a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            429 => ChatError::RateLimited,
            402 => ChatError::ServiceUnavailable,
            _ => ChatError::Transport {
                status: Some(status),
                message: message.into(),
            },
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::RateLimited => true,
            ChatError::Transport { status, .. } => match status {
                Some(code) => *code >= 500 || *code == 408,
                None => true,
            },
            ChatError::StreamAborted { reason, .. } => *reason == AbortReason::ReadFailed,
            ChatError::ServiceUnavailable | ChatError::Busy | ChatError::EmptyPrompt => false,
        }
    }

    /// Whether the conversation may hold a partial assistant reply.
    pub fn keeps_partial_content(&self) -> bool {
        matches!(self, ChatError::StreamAborted { .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::RateLimited => {
                "Rate limit exceeded. Please try again in a moment.".to_string()
            }
            ChatError::ServiceUnavailable => {
                "Service unavailable. Please contact support.".to_string()
            }
            ChatError::Transport { .. } => {
                "Failed to get AI response. Please try again.".to_string()
            }
            ChatError::StreamAborted { reason, .. } => match reason {
                AbortReason::Cancelled => "Response stopped.".to_string(),
                AbortReason::ReadFailed => {
                    "Connection lost while the answer was streaming. Please try again.".to_string()
                }
            },
            ChatError::Busy => {
                "Please wait for the current response to complete before sending another message."
                    .to_string()
            }
            ChatError::EmptyPrompt => "Type a message first.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::RateLimited => "E_CHAT_RATE_LIMIT",
            ChatError::ServiceUnavailable => "E_CHAT_UNAVAILABLE",
            ChatError::Transport { .. } => "E_CHAT_TRANSPORT",
            ChatError::StreamAborted {
                reason: AbortReason::Cancelled,
                ..
            } => "E_CHAT_CANCELLED",
            ChatError::StreamAborted {
                reason: AbortReason::ReadFailed,
                ..
            } => "E_CHAT_READ",
            ChatError::Busy => "E_CHAT_BUSY",
            ChatError::EmptyPrompt => "E_CHAT_EMPTY",
        }
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::RateLimited => write!(f, "Rate limited (429)"),
            ChatError::ServiceUnavailable => write!(f, "Service unavailable (402)"),
            ChatError::Transport { status, message } => match status {
                Some(code) => write!(f, "Transport error ({}): {}", code, message),
                None => write!(f, "Transport error: {}", message),
            },
            ChatError::StreamAborted { reason, message } => {
                write!(f, "Stream aborted ({}): {}", reason.as_str(), message)
            }
            ChatError::Busy => write!(f, "A response is already streaming"),
            ChatError::EmptyPrompt => write!(f, "Empty prompt"),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<HttpError> for ChatError {
    fn from(err: HttpError) -> Self {
        ChatError::Transport {
            status: None,
            message: err.to_string(),
        }
    }
}
