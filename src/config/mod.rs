//! Configuration module for the OpenRouter client.
//!
//! Holds the validated endpoint, credentials and identification metadata a
//! client is finalized with, plus the process-wide defaults.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::ConfigurationError;

/// Default base URL for the OpenRouter API.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default request timeout (3 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";
/// Environment variable overriding the timeout, in seconds.
pub const ENV_TIMEOUT: &str = "OPENROUTER_TIMEOUT";
/// Environment variable holding the referer URL.
pub const ENV_REFERER_URL: &str = "OPENROUTER_REFERER_URL";
/// Environment variable holding the referer title.
pub const ENV_REFERER_TITLE: &str = "OPENROUTER_REFERER_TITLE";

/// Validated configuration of a finalized client.
#[derive(Clone)]
pub struct OpenRouterConfig {
    pub(crate) api_key: SecretString,
    pub(crate) base_url: String,
    pub(crate) referer_url: String,
    pub(crate) referer_title: String,
}

impl OpenRouterConfig {
    /// Returns the base URL, without trailing slashes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the referer URL sent as `HTTP-Referer`; empty when unset.
    pub fn referer_url(&self) -> &str {
        &self.referer_url
    }

    /// Returns the referer title sent as `X-Title`; empty when unset.
    pub fn referer_title(&self) -> &str {
        &self.referer_title
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        key_hint(self.api_key.expose_secret())
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for OpenRouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("referer_url", &self.referer_url)
            .field("referer_title", &self.referer_title)
            .finish()
    }
}

/// Values read from the `OPENROUTER_*` environment variables.
#[derive(Debug, Default)]
pub(crate) struct EnvSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub referer_url: Option<String>,
    pub referer_title: Option<String>,
}

impl EnvSettings {
    /// Reads the process environment.
    pub fn load() -> Result<Self, ConfigurationError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// `OPENROUTER_API_KEY` is required; an unparsable timeout is ignored with
    /// a warning.
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(ENV_API_KEY).ok_or_else(|| ConfigurationError::Environment {
            message: format!("{} environment variable not set", ENV_API_KEY),
        })?;

        let timeout = lookup(ENV_TIMEOUT).and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) => Some(Duration::from_secs(secs)),
            Err(_) => {
                tracing::warn!(value = %raw, "Ignoring unparsable {}", ENV_TIMEOUT);
                None
            }
        });

        Ok(Self {
            api_key,
            base_url: lookup(ENV_BASE_URL),
            timeout,
            referer_url: lookup(ENV_REFERER_URL),
            referer_title: lookup(ENV_REFERER_TITLE),
        })
    }
}

/// Strips every trailing `/` from a URL. Purely textual.
pub fn trim_trailing_slashes(url: &str) -> &str {
    url.trim_end_matches('/')
}

pub(crate) fn key_hint(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 4 {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("...{}", tail)
    } else {
        "****".to_string()
    }
}
