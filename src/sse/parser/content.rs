//! Data frame payload decoding

use crate::sse::events::{FramePayload, SseParseError};
use crate::sse::payloads::CompletionChunk;

/// Decode the payload of a data frame.
///
/// Any syntactically valid JSON is accepted. Only `choices[0].delta.content`
/// and `choices[0].finish_reason` are read and whatever surrounds them is
/// ignored. A value without a string content is a control frame. Only
/// invalid JSON is an error, which the caller treats as a frame that is
/// not complete yet.
pub fn decode_payload(payload: &str) -> Result<FramePayload, SseParseError> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| SseParseError::IncompleteJson {
            source: e.to_string(),
        })?;

    let chunk = CompletionChunk::new(&value);

    match chunk.first_content() {
        Some(text) => Ok(FramePayload::Delta(text.to_string())),
        None => Ok(FramePayload::Control {
            finish_reason: chunk.finish_reason().map(str::to_string),
        }),
    }
}
