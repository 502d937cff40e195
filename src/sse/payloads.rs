//! SSE payload field access
//!
//! Chat completion chunks as sent by the assistant backend. Only the two
//! fields the assembler reads are looked up, by path, so siblings of any
//! shape (extra choices, tool calls, odd finish reasons) never hide content.

use serde_json::Value;

const CONTENT_PATH: &str = "/choices/0/delta/content";
const FINISH_REASON_PATH: &str = "/choices/0/finish_reason";

/// View over one parsed `chat.completion.chunk` object
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompletionChunk<'a> {
    value: &'a Value,
}

impl<'a> CompletionChunk<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Content fragment of the first choice, if it carries any text.
    pub fn first_content(&self) -> Option<&'a str> {
        self.value
            .pointer(CONTENT_PATH)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Finish reason of the first choice, when it is a string.
    pub fn finish_reason(&self) -> Option<&'a str> {
        self.value.pointer(FINISH_REASON_PATH).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_content_reads_first_choice_only() {
        let value = json!({"choices": [{"delta": {"content": "a"}}, {"delta": {"content": "b"}}]});
        assert_eq!(CompletionChunk::new(&value).first_content(), Some("a"));
    }

    #[test]
    fn test_missing_fields() {
        let value = json!({"id": "chatcmpl-1", "object": "chat.completion.chunk"});
        let chunk = CompletionChunk::new(&value);
        assert_eq!(chunk.first_content(), None);
        assert_eq!(chunk.finish_reason(), None);
    }

    #[test]
    fn test_non_string_finish_reason_ignored() {
        let value = json!({"choices": [{"delta": {"content": "hi"}, "finish_reason": {"x": 1}}]});
        let chunk = CompletionChunk::new(&value);
        assert_eq!(chunk.first_content(), Some("hi"));
        assert_eq!(chunk.finish_reason(), None);
    }
}
