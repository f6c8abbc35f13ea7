//! Authentication and identification headers.
//!
//! OpenRouter authenticates with a bearer token and optionally identifies the
//! calling application through `HTTP-Referer` and `X-Title`.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::config::{key_hint, OpenRouterConfig};

/// Header carrying the application URL.
pub const REFERER_HEADER: &str = "HTTP-Referer";
/// Header carrying the application title.
pub const TITLE_HEADER: &str = "X-Title";

/// Authentication provider trait.
///
/// Implementations add credentials to outgoing request headers.
pub trait AuthProvider: Send + Sync {
    /// Apply authentication to request headers.
    fn apply_auth(&self, headers: &mut HashMap<String, String>);
}

/// API key authentication provider.
pub struct ApiKeyAuth {
    api_key: SecretString,
}

impl ApiKeyAuth {
    /// Creates from a string API key.
    pub fn from_string(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
        }
    }

    /// Gets a hint of the API key for debugging (last 4 characters).
    pub fn key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }
}

impl AuthProvider for ApiKeyAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key.expose_secret()),
        );
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("api_key", &"[REDACTED]")
            .field("key_hint", &self.key_hint())
            .finish()
    }
}

/// Adds `HTTP-Referer` and `X-Title`, each only when non-empty.
pub fn apply_referer(config: &OpenRouterConfig, headers: &mut HashMap<String, String>) {
    if !config.referer_url().is_empty() {
        headers.insert(REFERER_HEADER.to_string(), config.referer_url().to_string());
    }
    if !config.referer_title().is_empty() {
        headers.insert(TITLE_HEADER.to_string(), config.referer_title().to_string());
    }
}
