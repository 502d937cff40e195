//! Streaming event assembler
//!
//! Folds a chat completion byte stream into a single growing assistant
//! message. Every chunk flows through the same pipeline:
//!
//! ```text
//! bytes -> Utf8ChunkDecoder -> LineFramer -> parse_sse_line -> decode_payload -> Conversation
//! ```
//!
//! All carried state lives in a caller-owned [`StreamSession`]; the
//! assembler itself only holds configuration, so a session can be driven
//! from a network loop or from a scripted list of chunks in tests.

mod session;

pub use session::{AbortReason, CloseReason, SessionState, SessionStats, StreamSession};

use tracing::{debug, warn};

use crate::models::{Conversation, MessageUpdate};
use crate::sse::{decode_payload, parse_sse_line, FramePayload, SseLine};

/// Default bound on consecutive re-parse attempts of one data line.
pub const DEFAULT_MAX_DECODE_RETRIES: u32 = 3;

/// Something the assembler did while processing input
#[derive(Debug, Clone, PartialEq)]
pub enum AssemblerEvent {
    /// A content fragment was folded into the conversation
    Delta { text: String, update: MessageUpdate },
    /// A data line never became valid JSON and was skipped
    FrameDropped { line: String, attempts: u32 },
    /// The session reached its terminal state
    Closed(CloseReason),
}

/// Stateless driver for [`StreamSession`]s
#[derive(Debug, Clone, Copy)]
pub struct StreamAssembler {
    max_decode_retries: u32,
}

impl Default for StreamAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DECODE_RETRIES)
    }
}

impl StreamAssembler {
    /// Create an assembler that gives up on a data line after
    /// `max_decode_retries` failed re-parses.
    pub fn new(max_decode_retries: u32) -> Self {
        Self { max_decode_retries }
    }

    pub fn max_decode_retries(&self) -> u32 {
        self.max_decode_retries
    }

    /// Process one chunk read from the response body.
    ///
    /// Feeding a closed session does nothing.
    pub fn feed(
        &self,
        session: &mut StreamSession,
        conversation: &mut Conversation,
        chunk: &[u8],
    ) -> Vec<AssemblerEvent> {
        let mut events = Vec::new();
        if !session.is_open() {
            return events;
        }

        session.stats_mut().bytes += chunk.len();
        let text = session.decoder.decode(chunk);
        session.framer.push(&text);

        self.drain_lines(session, conversation, &mut events, false);
        events
    }

    /// Process end of data: flush the decoder, treat an unterminated last
    /// line as complete, and close the session.
    pub fn finish(
        &self,
        session: &mut StreamSession,
        conversation: &mut Conversation,
    ) -> Vec<AssemblerEvent> {
        let mut events = Vec::new();
        if !session.is_open() {
            return events;
        }

        let tail = session.decoder.finish();
        session.framer.push(&tail);
        if !session.framer.is_empty() && !session.framer.pending().ends_with('\n') {
            session.framer.push("\n");
        }

        self.drain_lines(session, conversation, &mut events, true);

        if session.close(CloseReason::EndOfStream) {
            log_closed(session, CloseReason::EndOfStream);
            events.push(AssemblerEvent::Closed(CloseReason::EndOfStream));
        }
        events
    }

    /// Abort the session, discarding anything still buffered.
    ///
    /// Content already folded into the conversation is left in place.
    pub fn abort(&self, session: &mut StreamSession, reason: AbortReason) -> Option<AssemblerEvent> {
        if !session.is_open() {
            return None;
        }
        session.framer.clear();
        session.decoder.reset();
        session.retry.clear();
        let close = CloseReason::Aborted(reason);
        session.close(close);
        log_closed(session, close);
        Some(AssemblerEvent::Closed(close))
    }

    /// Run every complete buffered line through the parser.
    ///
    /// Stops early on the sentinel or when a data line has to wait for
    /// more text. With `at_eof` no more text will come, so a line that
    /// fails to decode is dropped instead of requeued.
    fn drain_lines(
        &self,
        session: &mut StreamSession,
        conversation: &mut Conversation,
        events: &mut Vec<AssemblerEvent>,
        at_eof: bool,
    ) {
        while session.is_open() {
            let Some(line) = session.framer.next_line() else {
                break;
            };
            session.stats_mut().lines += 1;

            let parsed = parse_sse_line(&line);
            let payload = match parsed {
                SseLine::Empty | SseLine::Comment(_) => continue,
                SseLine::Unknown(ref other) => {
                    debug!("Ignoring {} stream line: {}", parsed.kind_name(), other);
                    continue;
                }
                SseLine::Done => {
                    session.close(CloseReason::Completed);
                    log_closed(session, CloseReason::Completed);
                    events.push(AssemblerEvent::Closed(CloseReason::Completed));
                    break;
                }
                SseLine::Data(payload) => payload,
            };

            match decode_payload(&payload) {
                Ok(FramePayload::Delta(text)) => {
                    session.retry.clear();
                    session.stats_mut().deltas += 1;
                    session.append_content(&text);
                    let update = conversation.apply_assistant_content(
                        session.assistant_message_id(),
                        session.accumulated_content(),
                    );
                    events.push(AssemblerEvent::Delta { text, update });
                }
                Ok(FramePayload::Control { finish_reason }) => {
                    session.retry.clear();
                    if let Some(reason) = finish_reason {
                        debug!("Completion finished: {}", reason);
                    }
                }
                Err(e) => {
                    let attempts = session.retry.register_failure(&line);
                    if at_eof || attempts > self.max_decode_retries {
                        warn!(
                            "Dropping undecodable stream frame after {} attempt(s): {}",
                            attempts, e
                        );
                        session.retry.clear();
                        session.stats_mut().dropped_frames += 1;
                        events.push(AssemblerEvent::FrameDropped { line, attempts });
                        continue;
                    }
                    debug!("Frame not decodable yet (attempt {}): {}", attempts, e);
                    session.framer.requeue(&line);
                    break;
                }
            }
        }
    }
}

fn log_closed(session: &StreamSession, reason: CloseReason) {
    let stats = session.stats();
    debug!(
        "Stream session {} closed ({:?}): {} bytes, {} lines, {} deltas, {} dropped",
        session.assistant_message_id(),
        reason,
        stats.bytes,
        stats.lines,
        stats.deltas,
        stats.dropped_frames
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(content: &str) -> String {
        format!(
            "data: {}\n",
            serde_json::json!({"choices": [{"delta": {"content": content}}]})
        )
    }

    fn run(chunks: &[&[u8]]) -> (StreamSession, Conversation, Vec<AssemblerEvent>) {
        let assembler = StreamAssembler::default();
        let mut session = StreamSession::with_message_id("ai-1");
        let mut conversation = Conversation::new();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(assembler.feed(&mut session, &mut conversation, chunk));
        }
        events.extend(assembler.finish(&mut session, &mut conversation));
        (session, conversation, events)
    }

    fn deltas(events: &[AssemblerEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                AssemblerEvent::Delta { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_payload_split_across_reads() {
        let (session, conversation, events) = run(&[
            b"data: {\"choices\":[{\"delta\":{\"content\":\"Hel",
            b"lo\"}}]}\n",
        ]);
        assert_eq!(deltas(&events), vec!["Hello"]);
        assert_eq!(session.accumulated_content(), "Hello");
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.last().unwrap().content, "Hello");
    }

    #[test]
    fn test_two_frames_then_done_in_one_chunk() {
        let chunk = format!("{}{}data: [DONE]\n", frame("Save "), frame("more"));
        let assembler = StreamAssembler::default();
        let mut session = StreamSession::with_message_id("ai-1");
        let mut conversation = Conversation::new();
        conversation.push_user("How can I save more money?");

        let events = assembler.feed(&mut session, &mut conversation, chunk.as_bytes());

        assert_eq!(deltas(&events), vec!["Save ", "more"]);
        assert!(matches!(
            &events[0],
            AssemblerEvent::Delta { update: MessageUpdate::Created { id }, .. } if id == "ai-1"
        ));
        assert!(matches!(
            &events[1],
            AssemblerEvent::Delta { update: MessageUpdate::Appended { id }, .. } if id == "ai-1"
        ));
        assert_eq!(events[2], AssemblerEvent::Closed(CloseReason::Completed));
        assert_eq!(session.close_reason(), Some(CloseReason::Completed));
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.last().unwrap().content, "Save more");
    }

    #[test]
    fn test_done_stops_processing_remaining_bytes() {
        let chunk = format!("{}data: [DONE]\n{}", frame("kept"), frame("ignored"));
        let (session, conversation, _) = run(&[chunk.as_bytes(), frame("late").as_bytes()]);
        assert_eq!(session.accumulated_content(), "kept");
        assert_eq!(conversation.last().unwrap().content, "kept");
        assert_eq!(session.close_reason(), Some(CloseReason::Completed));
    }

    #[test]
    fn test_control_frame_does_not_mutate() {
        let assembler = StreamAssembler::default();
        let mut session = StreamSession::with_message_id("ai-1");
        let mut conversation = Conversation::new();

        let events = assembler.feed(
            &mut session,
            &mut conversation,
            b"data: {\"choices\":[{\"delta\":{}}]}\n",
        );
        assert!(events.is_empty());
        assert!(conversation.is_empty());
        assert!(session.is_open());

        let events = assembler.feed(&mut session, &mut conversation, frame("after").as_bytes());
        assert_eq!(deltas(&events), vec!["after"]);
    }

    #[test]
    fn test_comments_and_blanks_are_ignored() {
        let noisy = format!(
            ": keep-alive\n\n{}\r\n: ping\n{}event: message\n\ndata: [DONE]\n",
            frame("A").trim_end(),
            frame("B")
        );
        let clean = format!("{}{}data: [DONE]\n", frame("A"), frame("B"));

        let (noisy_session, _, _) = run(&[noisy.as_bytes()]);
        let (clean_session, _, _) = run(&[clean.as_bytes()]);
        assert_eq!(
            noisy_session.accumulated_content(),
            clean_session.accumulated_content()
        );
        assert_eq!(noisy_session.accumulated_content(), "AB");
    }

    #[test]
    fn test_unterminated_last_line_processed_at_end() {
        let stream = frame("tail");
        let (session, conversation, events) = run(&[stream.trim_end().as_bytes()]);
        assert_eq!(session.accumulated_content(), "tail");
        assert_eq!(conversation.len(), 1);
        assert_eq!(
            events.last(),
            Some(&AssemblerEvent::Closed(CloseReason::EndOfStream))
        );
    }

    #[test]
    fn test_malformed_frame_dropped_after_retry_bound() {
        let assembler = StreamAssembler::new(2);
        let mut session = StreamSession::with_message_id("ai-1");
        let mut conversation = Conversation::new();
        let bad_then_good = format!("data: {{not json\n{}", frame("ok"));

        let events = assembler.feed(&mut session, &mut conversation, bad_then_good.as_bytes());
        assert!(deltas(&events).is_empty());

        // First retry fails, line stays queued ahead of the good frame
        let events = assembler.feed(&mut session, &mut conversation, b"");
        assert!(deltas(&events).is_empty());
        assert!(session.pending_buffer().starts_with("data: {not json\n"));

        // Second failed retry reaches the bound: dropped, and the frame behind it flows
        let events = assembler.feed(&mut session, &mut conversation, b"");
        assert!(matches!(
            &events[0],
            AssemblerEvent::FrameDropped { attempts: 3, .. }
        ));
        assert_eq!(deltas(&events), vec!["ok"]);
        assert_eq!(session.stats().dropped_frames, 1);
        assert_eq!(session.accumulated_content(), "ok");
    }

    #[test]
    fn test_failing_frame_dropped_at_end_of_stream() {
        let stream = format!("{}data: {{\"choices\":\n{}", frame("a"), frame("b"));
        let (session, _, events) = run(&[stream.as_bytes()]);
        assert_eq!(session.accumulated_content(), "ab");
        assert_eq!(session.stats().dropped_frames, 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, AssemblerEvent::FrameDropped { .. })));
    }

    #[test]
    fn test_abort_discards_buffer_and_keeps_content() {
        let assembler = StreamAssembler::default();
        let mut session = StreamSession::with_message_id("ai-1");
        let mut conversation = Conversation::new();

        let partial = format!("{}data: {{\"choices\":[{{\"delta\"", frame("Part"));
        assembler.feed(&mut session, &mut conversation, partial.as_bytes());

        let event = assembler.abort(&mut session, AbortReason::Cancelled);
        assert_eq!(
            event,
            Some(AssemblerEvent::Closed(CloseReason::Aborted(AbortReason::Cancelled)))
        );
        assert_eq!(session.pending_buffer(), "");
        assert_eq!(conversation.last().unwrap().content, "Part");

        // Closed sessions ignore further input
        assert!(assembler
            .feed(&mut session, &mut conversation, frame("more").as_bytes())
            .is_empty());
        assert!(assembler.finish(&mut session, &mut conversation).is_empty());
        assert_eq!(assembler.abort(&mut session, AbortReason::ReadFailed), None);
        assert_eq!(conversation.last().unwrap().content, "Part");
    }

    #[test]
    fn test_content_grows_monotonically() {
        let stream: String = ["The ", "budget ", "is ", "₦20,000"]
            .iter()
            .map(|s| frame(s))
            .collect();
        let assembler = StreamAssembler::default();
        let mut session = StreamSession::with_message_id("ai-1");
        let mut conversation = Conversation::new();
        let mut last_len = 0;
        for byte in stream.as_bytes() {
            assembler.feed(&mut session, &mut conversation, std::slice::from_ref(byte));
            assert!(session.accumulated_content().len() >= last_len);
            last_len = session.accumulated_content().len();
        }
        assert_eq!(session.accumulated_content(), "The budget is ₦20,000");
        assert_eq!(conversation.len(), 1);
    }
}
