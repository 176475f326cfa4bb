//! Chat domain module.

mod message;

pub use message::{Citation, Message, MessageKind, MessageRole};
