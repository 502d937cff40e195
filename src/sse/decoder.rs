//! Incremental UTF-8 decoding of response body chunks
//!
//! Network reads end wherever the transport decides, which is often in the
//! middle of a multi-byte character. The decoder keeps the undecoded tail
//! of one chunk and prefixes it to the next.

/// Replacement emitted for byte sequences that can never decode.
const REPLACEMENT: char = '\u{FFFD}';

/// Streaming UTF-8 decoder with carried state.
#[derive(Debug, Default, Clone)]
pub struct Utf8ChunkDecoder {
    /// Bytes of an incomplete character left over from the last chunk (max 3)
    carry: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Create a new decoder with no carried bytes
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes waiting for the rest of their character
    pub fn pending_len(&self) -> usize {
        self.carry.len()
    }

    /// Decode a chunk, returning all text that is complete so far.
    ///
    /// Invalid sequences are replaced with U+FFFD. A truncated sequence at
    /// the end of the chunk is held back until the next call.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.carry);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // valid_up_to() guarantees this prefix is UTF-8
                    out.push_str(&String::from_utf8_lossy(valid));

                    match e.error_len() {
                        Some(len) => {
                            out.push(REPLACEMENT);
                            rest = &after[len..];
                        }
                        None => {
                            // Truncated character at the end of input
                            self.carry = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush carried bytes at end of stream.
    ///
    /// A character that never completed is emitted as U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.carry.is_empty() {
            String::new()
        } else {
            self.carry.clear();
            REPLACEMENT.to_string()
        }
    }

    /// Drop any carried bytes
    pub fn reset(&mut self) {
        self.carry.clear();
    }
}
