//! Common test utilities for integration tests.
//!
//! Frame builders for completion streams and helpers that run a scripted
//! list of chunks through the assembler.
//!
//! # Example
//!
//! ```ignore
//! use common::{delta_frame, run_chunks, DONE_FRAME};
//!
//! let stream = format!("{}{}", delta_frame("Hi"), DONE_FRAME);
//! let outcome = run_chunks(&[stream.as_bytes()]);
//! assert_eq!(outcome.content, "Hi");
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use finchat::assembler::{AssemblerEvent, CloseReason, StreamAssembler, StreamSession};
use finchat::models::Conversation;

pub const DONE_FRAME: &str = "data: [DONE]\n";

/// A `data:` line carrying one content delta.
pub fn delta_frame(content: &str) -> String {
    format!(
        "data: {}\n",
        serde_json::json!({"choices": [{"index": 0, "delta": {"content": content}}]})
    )
}

/// A `data:` line with a role-only delta and no content.
pub fn role_frame() -> String {
    "data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n".to_string()
}

/// A `data:` line that only reports the finish reason.
pub fn finish_frame() -> String {
    "data: {\"choices\":[{\"index\":0,\"delta\":{},\"finish_reason\":\"stop\"}]}\n".to_string()
}

/// A full completion stream for `parts`, terminated by the sentinel.
pub fn completion_stream(parts: &[&str]) -> String {
    let mut stream = role_frame();
    for part in parts {
        stream.push_str(&delta_frame(part));
    }
    stream.push_str(&finish_frame());
    stream.push_str(DONE_FRAME);
    stream
}

/// Result of running chunks through a fresh session.
pub struct Outcome {
    pub content: String,
    pub deltas: Vec<String>,
    pub close_reason: Option<CloseReason>,
    pub conversation: Conversation,
    pub events: Vec<AssemblerEvent>,
}

/// Feed every chunk, then signal end of data.
pub fn run_chunks(chunks: &[&[u8]]) -> Outcome {
    let assembler = StreamAssembler::default();
    let mut session = StreamSession::with_message_id("assistant-1");
    let mut conversation = Conversation::new();
    let mut events = Vec::new();

    for chunk in chunks {
        events.extend(assembler.feed(&mut session, &mut conversation, chunk));
    }
    events.extend(assembler.finish(&mut session, &mut conversation));

    let deltas = events
        .iter()
        .filter_map(|e| match e {
            AssemblerEvent::Delta { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect();

    Outcome {
        content: session.accumulated_content().to_string(),
        deltas,
        close_reason: session.close_reason(),
        conversation,
        events,
    }
}

/// Run `stream` split into two chunks at byte offset `at`.
pub fn run_split(stream: &[u8], at: usize) -> Outcome {
    let (head, tail) = stream.split_at(at);
    run_chunks(&[head, tail])
}
