//! SSE (Server-Sent Events) stream primitives
//!
//! Building blocks for reading a chat completion stream:
//! - `data: <json>` - data payload line
//! - `data: [DONE]` - end of stream
//! - Empty line - ignored
//! - Lines starting with `:` - comments (ignored)
//!
//! # Module structure
//! - `decoder` - UTF-8 decoding across chunk boundaries
//! - `framer` - Pending buffer and complete-line extraction
//! - `events` - Line and payload types (SseLine, FramePayload, SseParseError)
//! - `payloads` - Internal payload deserialization structs
//! - `parser` - Parsing logic (parse_sse_line, decode_payload)

mod decoder;
mod events;
mod framer;
mod parser;
mod payloads;

// Re-export public types
pub use decoder::Utf8ChunkDecoder;
pub use events::{FramePayload, SseLine, SseParseError, DONE_SENTINEL};
pub use framer::LineFramer;
pub use parser::{decode_payload, parse_sse_line};
