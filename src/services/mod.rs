//! Service implementations for the OpenRouter API.

mod chat;

pub use chat::{ChatService, CHAT_COMPLETIONS_PATH};
