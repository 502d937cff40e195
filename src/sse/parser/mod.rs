//! SSE line classification
//!
//! Turns one complete wire line into an [`SseLine`]. Payload decoding for
//! data frames lives in [`content`].

mod content;

use crate::sse::events::{SseLine, DONE_SENTINEL};

pub use content::decode_payload;

/// Prefix of a data frame. The space is part of the prefix on this wire.
const DATA_PREFIX: &str = "data: ";

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if line.trim().is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
        let payload = rest.trim();
        if payload == DONE_SENTINEL {
            return SseLine::Done;
        }
        return SseLine::Data(payload.to_string());
    }

    // Unknown line format - ignored so new frame types can't break the stream
    SseLine::Unknown(line.to_string())
}
