//! Line framing over decoded text
//!
//! Accumulates text in a pending buffer and hands out complete
//! newline-terminated lines. A trailing partial line stays buffered until
//! its terminator arrives.

/// Pending-buffer line framer.
#[derive(Debug, Default, Clone)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    /// Create an empty framer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append decoded text to the pending buffer
    pub fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Take the next complete line, without its terminator.
    ///
    /// A single trailing `\r` is stripped. Returns `None` when the buffer
    /// holds no `\n`; calling again without a `push` keeps returning `None`.
    pub fn next_line(&mut self) -> Option<String> {
        let newline_pos = self.buffer.find('\n')?;
        let mut line: String = self.buffer.drain(..=newline_pos).collect();
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    /// Put a line back at the front of the buffer, with its terminator, so
    /// the next framing pass yields it again.
    pub fn requeue(&mut self, line: &str) {
        let mut restored = String::with_capacity(line.len() + 1 + self.buffer.len());
        restored.push_str(line);
        restored.push('\n');
        restored.push_str(&self.buffer);
        self.buffer = restored;
    }

    /// Text currently buffered
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard buffered text
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(framer: &mut LineFramer) -> Vec<String> {
        std::iter::from_fn(|| framer.next_line()).collect()
    }

    #[test]
    fn test_single_complete_line() {
        let mut framer = LineFramer::new();
        framer.push("data: hello\n");
        assert_eq!(drain(&mut framer), vec!["data: hello"]);
        assert!(framer.is_empty());
    }

    #[test]
    fn test_partial_line_stays_buffered() {
        let mut framer = LineFramer::new();
        framer.push("data: hel");
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.pending(), "data: hel");

        framer.push("lo\n");
        assert_eq!(drain(&mut framer), vec!["data: hello"]);
    }

    #[test]
    fn test_multiple_lines_in_one_push() {
        let mut framer = LineFramer::new();
        framer.push("a\nb\n\nc");
        assert_eq!(drain(&mut framer), vec!["a", "b", ""]);
        assert_eq!(framer.pending(), "c");
    }

    #[test]
    fn test_crlf_terminator() {
        let mut framer = LineFramer::new();
        framer.push("a\r\nb\r");
        assert_eq!(drain(&mut framer), vec!["a"]);
        // The \r is kept until we know it precedes a \n
        framer.push("\n");
        assert_eq!(drain(&mut framer), vec!["b"]);
    }

    #[test]
    fn test_only_one_carriage_return_stripped() {
        let mut framer = LineFramer::new();
        framer.push("a\r\r\n");
        assert_eq!(drain(&mut framer), vec!["a\r"]);
    }

    #[test]
    fn test_framing_is_idempotent() {
        let mut framer = LineFramer::new();
        framer.push("one\ntwo\nthr");
        assert_eq!(drain(&mut framer), vec!["one", "two"]);
        assert_eq!(drain(&mut framer), Vec::<String>::new());
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.pending(), "thr");
    }

    #[test]
    fn test_requeue_yields_line_again_first() {
        let mut framer = LineFramer::new();
        framer.push("first\nsecond\n");
        let line = framer.next_line().unwrap();
        framer.requeue(&line);
        assert_eq!(drain(&mut framer), vec!["first", "second"]);
    }

    #[test]
    fn test_partial_line_stays_pending_until_clear() {
        let mut framer = LineFramer::new();
        framer.push("tail without newline");
        assert_eq!(framer.next_line(), None);
        assert_eq!(framer.pending(), "tail without newline");

        framer.push("x\ny");
        framer.clear();
        assert_eq!(framer.next_line(), None);
        assert!(framer.is_empty());
    }
}
