//! Per-request stream state.
//!
//! A `StreamSession` is owned by the caller and handed to the assembler on
//! every step. It carries everything that has to survive between reads.

use crate::models::new_message_id;
use crate::sse::{LineFramer, Utf8ChunkDecoder};

/// Why a session was aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The caller cancelled the stream
    Cancelled,
    /// Reading the response body failed
    ReadFailed,
}

impl AbortReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AbortReason::Cancelled => "cancelled",
            AbortReason::ReadFailed => "read_failed",
        }
    }
}

/// How a session reached its terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// `data: [DONE]` was received
    Completed,
    /// The byte stream ended without a sentinel
    EndOfStream,
    /// Cancelled or failed mid-stream; buffered partial lines were discarded
    Aborted(AbortReason),
}

/// Lifecycle of a session. There is no way back from `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed(CloseReason),
}

/// Counters collected while a session runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Raw bytes fed in
    pub bytes: usize,
    /// Complete lines framed (a requeued line is counted each time)
    pub lines: usize,
    /// Deltas folded into the conversation
    pub deltas: usize,
    /// Frames given up on after repeated decode failures
    pub dropped_frames: usize,
}

/// Consecutive decode failures of the line at the front of the buffer
#[derive(Debug, Default, Clone)]
pub(crate) struct RetryTracker {
    line: Option<String>,
    attempts: u32,
}

impl RetryTracker {
    /// Record a failed attempt for `line`, returning the attempt count
    pub(crate) fn register_failure(&mut self, line: &str) -> u32 {
        if self.line.as_deref() == Some(line) {
            self.attempts += 1;
        } else {
            self.line = Some(line.to_string());
            self.attempts = 1;
        }
        self.attempts
    }

    pub(crate) fn clear(&mut self) {
        self.line = None;
        self.attempts = 0;
    }
}

/// State of one streaming request/response exchange
#[derive(Debug)]
pub struct StreamSession {
    assistant_message_id: String,
    accumulated_content: String,
    state: SessionState,
    stats: SessionStats,
    pub(crate) decoder: Utf8ChunkDecoder,
    pub(crate) framer: LineFramer,
    pub(crate) retry: RetryTracker,
}

impl StreamSession {
    /// Open a session with a freshly generated assistant message id
    pub fn new() -> Self {
        Self::with_message_id(new_message_id())
    }

    /// Open a session that will write into the message with this id
    pub fn with_message_id(assistant_message_id: impl Into<String>) -> Self {
        Self {
            assistant_message_id: assistant_message_id.into(),
            accumulated_content: String::new(),
            state: SessionState::Open,
            stats: SessionStats::default(),
            decoder: Utf8ChunkDecoder::new(),
            framer: LineFramer::new(),
            retry: RetryTracker::default(),
        }
    }

    pub fn assistant_message_id(&self) -> &str {
        &self.assistant_message_id
    }

    /// Everything received so far, in arrival order
    pub fn accumulated_content(&self) -> &str {
        &self.accumulated_content
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// `Some` once the session is closed
    pub fn close_reason(&self) -> Option<CloseReason> {
        match self.state {
            SessionState::Open => None,
            SessionState::Closed(reason) => Some(reason),
        }
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Text buffered but not yet framed into a complete line
    pub fn pending_buffer(&self) -> &str {
        self.framer.pending()
    }

    pub(crate) fn stats_mut(&mut self) -> &mut SessionStats {
        &mut self.stats
    }

    pub(crate) fn append_content(&mut self, delta: &str) {
        self.accumulated_content.push_str(delta);
    }

    /// Move to `Closed`. Returns false if the session was already closed.
    pub(crate) fn close(&mut self, reason: CloseReason) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = SessionState::Closed(reason);
        true
    }
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}
