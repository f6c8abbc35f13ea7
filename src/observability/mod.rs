//! Observability module for the OpenRouter client.
//!
//! Structured logging through `tracing`, with an optional subscriber setup
//! for applications.

mod logging;

pub use logging::{
    log_request, log_response, redact, LogFormat, LogLevel, LoggingConfig, MAX_LOGGED_BODY_CHARS,
};
