mod conversation;
mod message;
mod request;

pub use conversation::{Conversation, MessageUpdate, GREETING};
pub use message::{new_message_id, Message, MessageRole};
pub use request::{ChatRequest, ChatTurn};
