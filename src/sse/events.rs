//! SSE line and frame types
//!
//! Contains the SseLine classification of a single wire line and the
//! outcome types produced when a data frame's payload is decoded.

/// Literal payload that marks the end of a chat completion stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Empty line, carries no event for this protocol
    Empty,
    /// Comment line (starts with ':'), used by servers as keepalive
    Comment(String),
    /// Data frame payload with surrounding whitespace trimmed
    Data(String),
    /// `data: [DONE]` - the stream is complete
    Done,
    /// Any other line shape (e.g. `event:` or `id:`), ignored
    Unknown(String),
}

impl SseLine {
    /// Returns the line kind as a string for logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            SseLine::Empty => "empty",
            SseLine::Comment(_) => "comment",
            SseLine::Data(_) => "data",
            SseLine::Done => "done",
            SseLine::Unknown(_) => "unknown",
        }
    }
}

/// Result of decoding the payload of a data frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FramePayload {
    /// The frame carried an incremental content fragment
    Delta(String),
    /// Valid frame without content (role announcement, finish marker, ...)
    Control {
        finish_reason: Option<String>,
    },
}

/// SSE payload errors.
///
/// These never leave the assembler: a payload that fails to parse is
/// treated as a frame whose continuation has not arrived yet.
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    /// Payload is not (yet) a complete JSON value
    IncompleteJson { source: String },
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::IncompleteJson { source } => {
                write!(f, "Incomplete JSON payload: {}", source)
            }
        }
    }
}

impl std::error::Error for SseParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(SseLine::Empty.kind_name(), "empty");
        assert_eq!(SseLine::Comment("ping".to_string()).kind_name(), "comment");
        assert_eq!(SseLine::Data("{}".to_string()).kind_name(), "data");
        assert_eq!(SseLine::Done.kind_name(), "done");
        assert_eq!(SseLine::Unknown("id: 1".to_string()).kind_name(), "unknown");
    }

    #[test]
    fn test_parse_error_display() {
        let err = SseParseError::IncompleteJson {
            source: "EOF while parsing a string".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Incomplete JSON payload: EOF while parsing a string"
        );
    }
}
