//! OpenRouter Client Library
//!
//! A typed Rust client for the OpenRouter chat completions API. A client is
//! assembled with a chainable builder and validated once, at creation;
//! responses are decoded into strongly-typed structures whose finish reason
//! accepts values newer than this crate.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use openrouter_client::{FinishReason, OpenRouterClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenRouterClient::builder()
//!         .api_key("sk-or-v1-your-key")
//!         .referer_url("https://myapp.example")
//!         .referer_title("My App")
//!         .create()?;
//!
//!     let request = serde_json::json!({
//!         "model": "openai/gpt-4o",
//!         "messages": [{"role": "user", "content": "Hello, OpenRouter!"}]
//!     });
//!
//!     let response = client.chat().create(&request).await?;
//!     if response.finish_reason() == Some(&FinishReason::LENGTH) {
//!         eprintln!("response was truncated");
//!     }
//!     println!("{}", response.content().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! # Decoding Only
//!
//! ```rust
//! use openrouter_client::{ChatCompletionResponse, FinishReason};
//!
//! let body = r#"{"id":"abc","choices":[{"finish_reason":"stop","message":{}}]}"#;
//! let response: ChatCompletionResponse = body.parse().unwrap();
//! assert_eq!(response.choices[0].finish_reason, FinishReason::STOP);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{OpenRouterClient, OpenRouterClientBuilder};
pub use config::{OpenRouterConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use errors::{ConfigurationError, MalformedResponseError, OpenRouterError, OpenRouterResult};
pub use transport::{HttpTransport, HttpTransportImpl, TransportError};

// Type re-exports
pub use types::chat::{ChatCompletionResponse, ChatMessage, Choice, FinishReason, Usage};
pub use types::tools::{FunctionCall, ToolCall};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
