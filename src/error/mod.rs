//! Error handling for the chat transport.
//!
//! | Error | Session opened | Retryable |
//! |-------|----------------|-----------|
//! | `RateLimited` (429) | No | Yes |
//! | `ServiceUnavailable` (402) | No | No |
//! | `Transport` | No | 5xx / connection only |
//! | `StreamAborted` | Yes, partial content kept | Read failures only |
//! | `Busy` / `EmptyPrompt` | No | No |
//!
//! # Example
//!
//! ```ignore
//! match controller.send("How can I save more money?", cancel, |_| {}).await {
//!     Ok(summary) => println!("{} deltas", summary.stats.deltas),
//!     Err(err) => eprintln!("{}", err.user_message()),
//! }
//! ```

mod chat;

pub use chat::ChatError;

/// Type alias for Results using ChatError.
pub type ChatResult<T> = Result<T, ChatError>;
