//! Error types for the OpenRouter client.
//!
//! Configuration problems are reported when a client is finalized, shape
//! mismatches are reported when a response body is decoded, and transport
//! failures are passed through untouched.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for OpenRouter operations.
pub type OpenRouterResult<T> = Result<T, OpenRouterError>;

/// Error raised while finalizing a client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The base URL is empty after all builder mutations.
    #[error("Configuration error: base URL is required")]
    BaseUrlRequired,

    /// The API key is empty.
    #[error("Configuration error: API key is required")]
    ApiKeyRequired,

    /// The default HTTP client could not be constructed.
    #[error("Configuration error: failed to build HTTP client: {message}")]
    HttpClient {
        /// Error message from the HTTP client builder.
        message: String,
    },

    /// A required environment variable is missing or unreadable.
    #[error("Configuration error: {message}")]
    Environment {
        /// Error message describing the environment issue.
        message: String,
    },
}

/// Error raised when a response body does not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed response: {message} (line {line}, column {column})")]
pub struct MalformedResponseError {
    /// Decoder message.
    pub message: String,
    /// Line of the offending token (1-based, 0 if unknown).
    pub line: usize,
    /// Column of the offending token (1-based, 0 if unknown).
    pub column: usize,
}

impl From<serde_json::Error> for MalformedResponseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

/// Error type for OpenRouter client operations.
#[derive(Debug, Error)]
pub enum OpenRouterError {
    /// Client configuration was invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Response body could not be decoded.
    #[error(transparent)]
    MalformedResponse(#[from] MalformedResponseError),

    /// Failure reported by the HTTP transport, unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API, or the raw body.
        message: String,
        /// Upstream error code, if any.
        code: Option<serde_json::Value>,
    },

    /// Request body could not be encoded.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl OpenRouterError {
    /// Returns the HTTP status carried by an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            OpenRouterError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, OpenRouterError::Configuration(_))
    }
}

/// API error envelope returned by OpenRouter.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// The error details.
    pub error: ApiErrorDetail,
}

/// Detailed API error information.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    /// The error message.
    pub message: String,
    /// The error code. OpenRouter sends numbers, some providers send strings.
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}
