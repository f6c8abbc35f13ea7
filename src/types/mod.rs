//! Type definitions for the OpenRouter API.

pub mod chat;
mod de;
pub mod tools;
