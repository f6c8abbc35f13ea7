//! OpenRouter API client.
//!
//! A client is produced by [`OpenRouterClientBuilder::create`], the single
//! step that validates the accumulated configuration.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{
    trim_trailing_slashes, EnvSettings, OpenRouterConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
};
use crate::errors::ConfigurationError;
use crate::observability::LoggingConfig;
use crate::services::ChatService;
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main OpenRouter client.
///
/// Immutable once created; share it freely across tasks.
///
/// # Example
///
/// ```rust,no_run
/// use openrouter_client::OpenRouterClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = OpenRouterClient::builder()
///         .api_key("sk-or-v1-your-key")
///         .referer_title("My App")
///         .create()?;
///
///     let request = serde_json::json!({
///         "model": "openai/gpt-4o",
///         "messages": [{"role": "user", "content": "Hello!"}]
///     });
///
///     let response = client.chat().create(&request).await?;
///     println!("{}", response.content().unwrap_or_default());
///     Ok(())
/// }
/// ```
pub struct OpenRouterClient {
    config: Arc<OpenRouterConfig>,
    transport: Arc<dyn HttpTransport>,
    chat_service: ChatService,
}

impl OpenRouterClient {
    /// Creates a new client builder.
    pub fn builder() -> OpenRouterClientBuilder {
        OpenRouterClientBuilder::new()
    }

    /// Creates a client from the `OPENROUTER_*` environment variables.
    ///
    /// Reads `OPENROUTER_API_KEY` and optionally `OPENROUTER_BASE_URL`,
    /// `OPENROUTER_TIMEOUT`, `OPENROUTER_REFERER_URL` and
    /// `OPENROUTER_REFERER_TITLE`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        OpenRouterClientBuilder::from_env()?.create()
    }

    /// Returns the chat service.
    pub fn chat(&self) -> &ChatService {
        &self.chat_service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &OpenRouterConfig {
        &self.config
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Returns the transport handle.
    pub fn transport(&self) -> &Arc<dyn HttpTransport> {
        &self.transport
    }

    /// Returns the timeout currently configured on the transport.
    pub fn timeout(&self) -> Duration {
        self.transport.timeout()
    }
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("config", &self.config)
            .field("timeout", &self.timeout())
            .finish()
    }
}

/// Builder for the OpenRouter client.
///
/// Mutators are chainable and never fail; all validation happens in
/// [`create`](Self::create). Because `create` only borrows the builder, a
/// failed call can be followed by a fix and another `create`.
#[derive(Clone)]
pub struct OpenRouterClientBuilder {
    base_url: String,
    api_key: String,
    transport: Option<Arc<dyn HttpTransport>>,
    default_timeout: Duration,
    referer_url: String,
    referer_title: String,
    log_config: LoggingConfig,
}

impl OpenRouterClientBuilder {
    /// Creates a new client builder with the default base URL and timeout.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            transport: None,
            default_timeout: DEFAULT_TIMEOUT,
            referer_url: String::new(),
            referer_title: String::new(),
            log_config: LoggingConfig::default(),
        }
    }

    /// Creates a builder pre-filled from the `OPENROUTER_*` environment
    /// variables.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Ok(Self::from_settings(EnvSettings::load()?))
    }

    pub(crate) fn from_settings(env: EnvSettings) -> Self {
        let mut builder = Self::new().api_key(env.api_key);
        if let Some(base_url) = env.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout) = env.timeout {
            builder = builder.default_timeout(timeout);
        }
        if let Some(referer_url) = env.referer_url {
            builder = builder.referer_url(referer_url);
        }
        if let Some(referer_title) = env.referer_title {
            builder = builder.referer_title(referer_title);
        }
        builder
    }

    /// Sets a custom base URL. Trailing slashes are stripped.
    ///
    /// If not set, `https://openrouter.ai/api/v1` is used.
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = trim_trailing_slashes(base_url.as_ref()).to_string();
        self
    }

    /// Sets the API key, stored verbatim.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Sets the HTTP transport, replacing the default one.
    ///
    /// The handle stays shared with the caller. A later
    /// [`default_timeout`](Self::default_timeout) reconfigures this same
    /// handle, so the caller observes the new timeout too.
    pub fn http_client(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the timeout used for every request.
    ///
    /// Applies to the transport held right now: a transport supplied through
    /// [`http_client`](Self::http_client) is mutated in place (last mutation
    /// wins, visible to all holders); otherwise the default transport is
    /// created with this timeout. Defaults to 3 minutes.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        match &self.transport {
            Some(transport) => transport.set_timeout(timeout),
            None => self.default_timeout = timeout,
        }
        self
    }

    /// Sets the application URL sent as `HTTP-Referer`.
    ///
    /// - <https://openrouter.ai/docs/api-reference/overview#headers>
    pub fn referer_url(mut self, referer_url: impl Into<String>) -> Self {
        self.referer_url = referer_url.into();
        self
    }

    /// Sets the application title sent as `X-Title`.
    ///
    /// - <https://openrouter.ai/docs/api-reference/overview#headers>
    pub fn referer_title(mut self, referer_title: impl Into<String>) -> Self {
        self.referer_title = referer_title.into();
        self
    }

    /// Sets the logging options used by the client's services.
    ///
    /// Request and response bodies are left out of debug events unless
    /// [`LoggingConfig::log_bodies`] is set.
    pub fn log_config(mut self, config: LoggingConfig) -> Self {
        self.log_config = config;
        self
    }

    /// Validates the configuration and creates the client.
    ///
    /// The base URL is checked before the API key.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::BaseUrlRequired`] if the base URL is empty.
    /// - [`ConfigurationError::ApiKeyRequired`] if the API key is empty.
    /// - [`ConfigurationError::HttpClient`] if the default transport cannot
    ///   be built.
    pub fn create(&self) -> Result<OpenRouterClient, ConfigurationError> {
        if self.base_url.is_empty() {
            return Err(ConfigurationError::BaseUrlRequired);
        }
        if self.api_key.is_empty() {
            return Err(ConfigurationError::ApiKeyRequired);
        }

        let transport: Arc<dyn HttpTransport> = match &self.transport {
            Some(transport) => Arc::clone(transport),
            None => Arc::new(HttpTransportImpl::new(self.default_timeout).map_err(|e| {
                ConfigurationError::HttpClient {
                    message: e.to_string(),
                }
            })?),
        };

        let config = Arc::new(OpenRouterConfig {
            api_key: SecretString::new(self.api_key.clone()),
            base_url: self.base_url.clone(),
            referer_url: self.referer_url.clone(),
            referer_title: self.referer_title.clone(),
        });
        let auth: Arc<dyn AuthProvider> = Arc::new(ApiKeyAuth::from_string(self.api_key.clone()));

        tracing::debug!(
            base_url = %config.base_url(),
            api_key = %config.api_key_hint(),
            timeout_ms = u64::try_from(transport.timeout().as_millis()).unwrap_or(u64::MAX),
            "Created OpenRouter client"
        );

        let chat_service = ChatService::new(
            Arc::clone(&transport),
            auth,
            Arc::clone(&config),
            self.log_config.clone(),
        );

        Ok(OpenRouterClient {
            config,
            transport,
            chat_service,
        })
    }
}

impl Default for OpenRouterClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OpenRouterClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClientBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("custom_transport", &self.transport.is_some())
            .field("default_timeout", &self.default_timeout)
            .field("referer_url", &self.referer_url)
            .field("referer_title", &self.referer_title)
            .field("log_config", &self.log_config)
            .finish()
    }
}
