//! Chat turn orchestration.
//!
//! [`ChatController`] owns the conversation and runs one exchange at a time:
//! validate the prompt, record the user turn, open the stream, then drive a
//! [`StreamSession`] until it completes, fails or is cancelled.

use std::ops::{Deref, DerefMut};

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::adapters::ReqwestHttpClient;
use crate::assembler::{
    AbortReason, AssemblerEvent, CloseReason, SessionStats, StreamAssembler, StreamSession,
};
use crate::client::ChatClient;
use crate::config::ChatConfig;
use crate::error::{ChatError, ChatResult};
use crate::models::{ChatRequest, Conversation};
use crate::traits::HttpClient;

/// Outcome of a completed exchange
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSummary {
    /// Id of the assistant message the stream wrote to
    pub message_id: String,
    /// Full assistant reply (may be empty)
    pub content: String,
    /// `Completed` or `EndOfStream`
    pub close_reason: CloseReason,
    pub stats: SessionStats,
}

/// Holds the conversation's stream claim and releases it when dropped,
/// including when the `send` future itself is dropped mid-stream.
struct StreamClaim<'a> {
    conversation: &'a mut Conversation,
    message_id: String,
}

impl<'a> StreamClaim<'a> {
    fn acquire(conversation: &'a mut Conversation, message_id: &str) -> Option<Self> {
        if !conversation.begin_stream(message_id) {
            return None;
        }
        Some(Self {
            conversation,
            message_id: message_id.to_string(),
        })
    }
}

impl Deref for StreamClaim<'_> {
    type Target = Conversation;

    fn deref(&self) -> &Conversation {
        self.conversation
    }
}

impl DerefMut for StreamClaim<'_> {
    fn deref_mut(&mut self) -> &mut Conversation {
        self.conversation
    }
}

impl Drop for StreamClaim<'_> {
    fn drop(&mut self) {
        self.conversation.end_stream(&self.message_id);
    }
}

/// Runs chat exchanges against one conversation.
pub struct ChatController<H: HttpClient = ReqwestHttpClient> {
    client: ChatClient<H>,
    conversation: Conversation,
    assembler: StreamAssembler,
}

impl ChatController<ReqwestHttpClient> {
    /// Create a controller backed by reqwest, starting from the greeting.
    pub fn new(config: ChatConfig) -> Self {
        Self::with_client(ChatClient::new(config))
    }
}

impl<H: HttpClient> ChatController<H> {
    /// Create a controller over an existing client, starting from the greeting.
    pub fn with_client(client: ChatClient<H>) -> Self {
        let assembler = StreamAssembler::new(client.config().max_decode_retries);
        Self {
            client,
            conversation: Conversation::with_greeting(),
            assembler,
        }
    }

    /// Replace the conversation this controller writes to.
    pub fn with_conversation(mut self, conversation: Conversation) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn client(&self) -> &ChatClient<H> {
        &self.client
    }

    pub fn is_streaming(&self) -> bool {
        self.conversation.is_streaming()
    }

    /// Send `prompt` and stream the reply into the conversation.
    ///
    /// `on_event` sees every assembler event as it happens. Cancelling
    /// `cancel` stops the stream; content received so far stays in the
    /// conversation and `StreamAborted` is returned.
    pub async fn send<F>(
        &mut self,
        prompt: &str,
        cancel: CancellationToken,
        mut on_event: F,
    ) -> ChatResult<StreamSummary>
    where
        F: FnMut(&AssemblerEvent),
    {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        if let Some(active) = self.conversation.active_stream() {
            debug!("Rejecting prompt, stream {} still active", active);
            return Err(ChatError::Busy);
        }

        let request = ChatRequest::with_user_turn(&self.conversation, prompt);
        self.conversation.push_user(prompt);

        let mut body = self.client.open_stream(&request).await?;

        let assembler = self.assembler;
        let mut session = StreamSession::new();
        let Some(mut conversation) =
            StreamClaim::acquire(&mut self.conversation, session.assistant_message_id())
        else {
            return Err(ChatError::Busy);
        };
        debug!("Stream session {} opened", session.assistant_message_id());

        let aborted = loop {
            if !session.is_open() {
                break None;
            }
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Stream {} cancelled by caller", session.assistant_message_id());
                    break Some((AbortReason::Cancelled, "Cancelled by user".to_string()));
                }
                next = body.next() => {
                    match next {
                        Some(Ok(chunk)) => {
                            for event in assembler.feed(&mut session, &mut conversation, &chunk) {
                                on_event(&event);
                            }
                        }
                        Some(Err(e)) => {
                            warn!("Stream {} read failed: {}", session.assistant_message_id(), e);
                            break Some((AbortReason::ReadFailed, e.to_string()));
                        }
                        None => {
                            for event in assembler.finish(&mut session, &mut conversation) {
                                on_event(&event);
                            }
                        }
                    }
                }
            }
        };

        // Release the connection before reporting
        drop(body);
        drop(conversation);

        if let Some((reason, message)) = aborted {
            if let Some(event) = assembler.abort(&mut session, reason) {
                on_event(&event);
            }
            return Err(ChatError::StreamAborted { reason, message });
        }

        let close_reason = session.close_reason().unwrap_or(CloseReason::EndOfStream);
        let stats = session.stats();
        info!(
            "Stream {} finished ({:?}): {} deltas, {} dropped frames",
            session.assistant_message_id(),
            close_reason,
            stats.deltas,
            stats.dropped_frames
        );

        Ok(StreamSummary {
            message_id: session.assistant_message_id().to_string(),
            content: session.accumulated_content().to_string(),
            close_reason,
            stats,
        })
    }
}
