//! HTTP transport layer for the OpenRouter client.
//!
//! The client never performs I/O itself; every request goes through an
//! [`HttpTransport`] handle that may be shared with the caller.

mod http;

pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, HttpTransportImpl};

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Transport error types.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

/// Timeout cell that can be changed through a shared reference.
///
/// Stored as whole milliseconds; durations beyond `u64::MAX` ms saturate.
#[derive(Debug)]
pub struct SharedTimeout(AtomicU64);

impl SharedTimeout {
    /// Creates a cell holding `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self(AtomicU64::new(to_millis(timeout)))
    }

    /// Returns the current timeout.
    pub fn get(&self) -> Duration {
        Duration::from_millis(self.0.load(Ordering::Acquire))
    }

    /// Replaces the timeout. The last write wins for every holder.
    pub fn set(&self, timeout: Duration) {
        self.0.store(to_millis(timeout), Ordering::Release);
    }
}

fn to_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_timeout_set_get() {
        let timeout = SharedTimeout::new(Duration::from_secs(180));
        assert_eq!(timeout.get(), Duration::from_secs(180));

        timeout.set(Duration::from_millis(1500));
        assert_eq!(timeout.get(), Duration::from_millis(1500));
    }

    #[test]
    fn test_shared_timeout_saturates() {
        let timeout = SharedTimeout::new(Duration::MAX);
        assert_eq!(timeout.get(), Duration::from_millis(u64::MAX));
    }
}
