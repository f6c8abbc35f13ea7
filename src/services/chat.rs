//! Chat completions service.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

use crate::auth::{apply_referer, AuthProvider};
use crate::config::OpenRouterConfig;
use crate::errors::{ApiErrorResponse, OpenRouterError, OpenRouterResult};
use crate::observability::{log_request, log_response, LoggingConfig};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::chat::ChatCompletionResponse;

/// Path of the chat completions endpoint, relative to the base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Chat completions service.
///
/// Request bodies are built by the caller; any `Serialize` value is sent
/// as-is. Bodies only reach the debug log when enabled through
/// [`LoggingConfig::log_bodies`].
pub struct ChatService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    config: Arc<OpenRouterConfig>,
    log_config: LoggingConfig,
}

impl ChatService {
    /// Creates a new chat service.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        config: Arc<OpenRouterConfig>,
        log_config: LoggingConfig,
    ) -> Self {
        Self {
            transport,
            auth,
            config,
            log_config,
        }
    }

    /// Creates a chat completion.
    ///
    /// Transport failures are returned unchanged; a non-2xx status becomes
    /// [`OpenRouterError::Api`] and an undecodable body
    /// [`OpenRouterError::MalformedResponse`].
    #[instrument(skip(self, request), fields(base_url = %self.config.base_url()))]
    pub async fn create<R>(&self, request: &R) -> OpenRouterResult<ChatCompletionResponse>
    where
        R: Serialize + ?Sized,
    {
        let http_request = self.build_request(request)?;
        let request_body = http_request
            .body
            .as_deref()
            .filter(|_| self.log_config.log_request_bodies)
            .and_then(|b| std::str::from_utf8(b).ok());
        log_request("POST", &http_request.url, request_body);

        let started = Instant::now();
        let response = self.transport.send(http_request).await?;
        let response_body = Some(response.body.as_slice())
            .filter(|_| self.log_config.log_response_bodies)
            .and_then(|b| std::str::from_utf8(b).ok());
        log_response(
            response.status,
            u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            response_body,
        );

        self.parse_response(&response)
    }

    /// Builds an HTTP request from a request body.
    fn build_request<R>(&self, request: &R) -> OpenRouterResult<HttpRequest>
    where
        R: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(request).map_err(|e| OpenRouterError::Serialization {
            message: format!("Failed to serialize request: {}", e),
        })?;

        let mut http_request = HttpRequest::post(self.config.endpoint_url(CHAT_COMPLETIONS_PATH))
            .with_header("Content-Type", "application/json")
            .with_body(body);
        self.auth.apply_auth(&mut http_request.headers);
        apply_referer(&self.config, &mut http_request.headers);

        Ok(http_request)
    }

    /// Parses the HTTP response.
    fn parse_response(&self, response: &HttpResponse) -> OpenRouterResult<ChatCompletionResponse> {
        if !response.is_success() {
            return Err(parse_error_response(response));
        }

        let parsed = ChatCompletionResponse::from_slice(&response.body)?;
        if !parsed.usage.is_consistent() {
            tracing::debug!(
                prompt_tokens = parsed.usage.prompt_tokens,
                completion_tokens = parsed.usage.completion_tokens,
                total_tokens = parsed.usage.total_tokens,
                "Usage total differs from prompt + completion"
            );
        }
        Ok(parsed)
    }
}

/// Parses an error response.
fn parse_error_response(response: &HttpResponse) -> OpenRouterError {
    match serde_json::from_slice::<ApiErrorResponse>(&response.body) {
        Ok(api_error) => OpenRouterError::Api {
            status: response.status,
            message: api_error.error.message,
            code: api_error.error.code,
        },
        Err(_) => OpenRouterError::Api {
            status: response.status,
            message: String::from_utf8_lossy(&response.body).into_owned(),
            code: None,
        },
    }
}

impl std::fmt::Debug for ChatService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatService")
            .field("endpoint", &self.config.endpoint_url(CHAT_COMPLETIONS_PATH))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ApiKeyAuth;
    use crate::mocks::{MockResponse, MockTransport};
    use crate::transport::{HttpMethod, TransportError};
    use crate::types::chat::FinishReason;
    use secrecy::SecretString;
    use std::io;
    use std::sync::Mutex;
    use std::time::Duration;

    const RESPONSE: &str = r#"{"id":"abc","object":"chat.completion","created":1700000000,"model":"gpt-x","choices":[{"finish_reason":"stop","message":{"role":"assistant","content":"Hi"}}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;

    fn service(referer_url: &str, referer_title: &str) -> (ChatService, Arc<MockTransport>) {
        service_with_logging(referer_url, referer_title, LoggingConfig::default())
    }

    fn service_with_logging(
        referer_url: &str,
        referer_title: &str,
        log_config: LoggingConfig,
    ) -> (ChatService, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let config = Arc::new(OpenRouterConfig {
            api_key: SecretString::new("sk-or-v1-test".to_string()),
            base_url: "https://openrouter.test/api/v1".to_string(),
            referer_url: referer_url.to_string(),
            referer_title: referer_title.to_string(),
        });
        let service = ChatService::new(
            transport.clone(),
            Arc::new(ApiKeyAuth::from_string("sk-or-v1-test")),
            config,
            log_config,
        );
        (service, transport)
    }

    /// In-memory sink for a scoped `fmt` subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }

        fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
            let sink = self.clone();
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::DEBUG)
                .with_ansi(false)
                .with_writer(move || sink.clone())
                .finish()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn body() -> serde_json::Value {
        serde_json::json!({
            "model": "openai/gpt-4o",
            "messages": [{"role": "user", "content": "Hello"}]
        })
    }

    #[tokio::test]
    async fn test_create_sends_request() {
        let (service, transport) = service("", "");
        transport.queue(MockResponse::raw(200, RESPONSE));

        let response = service.create(&body()).await.unwrap();
        assert_eq!(response.id, "abc");
        assert_eq!(response.finish_reason(), Some(&FinishReason::STOP));
        assert_eq!(response.content(), Some("Hi"));

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "https://openrouter.test/api/v1/chat/completions");
        assert_eq!(
            request.headers.get("Authorization"),
            Some(&"Bearer sk-or-v1-test".to_string())
        );
        assert_eq!(
            request.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert!(!request.headers.contains_key("HTTP-Referer"));
        assert!(!request.headers.contains_key("X-Title"));

        let sent: serde_json::Value = serde_json::from_slice(&request.body.unwrap()).unwrap();
        assert_eq!(sent, body());
    }

    #[tokio::test]
    async fn test_create_sends_referer_headers() {
        let (service, transport) = service("https://myapp.example", "My App");
        transport.queue(MockResponse::raw(200, RESPONSE));

        service.create(&body()).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(
            request.headers.get("HTTP-Referer"),
            Some(&"https://myapp.example".to_string())
        );
        assert_eq!(request.headers.get("X-Title"), Some(&"My App".to_string()));
    }

    #[tokio::test]
    async fn test_create_api_error() {
        let (service, transport) = service("", "");
        transport.queue_error(402, "Insufficient credits");

        match service.create(&body()).await {
            Err(OpenRouterError::Api {
                status,
                message,
                code,
            }) => {
                assert_eq!(status, 402);
                assert_eq!(message, "Insufficient credits");
                assert_eq!(code, Some(serde_json::json!(402)));
            }
            other => panic!("Expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_api_error_plain_body() {
        let (service, transport) = service("", "");
        transport.queue(MockResponse::raw(502, "Bad Gateway"));

        match service.create(&body()).await {
            Err(OpenRouterError::Api { status, message, .. }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("Expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_transport_error_passes_through() {
        let (service, transport) = service("", "");
        transport.queue_failure(TransportError::Timeout {
            timeout: Duration::from_secs(180),
        });

        match service.create(&body()).await {
            Err(OpenRouterError::Transport(TransportError::Timeout { timeout })) => {
                assert_eq!(timeout, Duration::from_secs(180));
            }
            other => panic!("Expected transport timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_malformed_body() {
        let (service, transport) = service("", "");
        transport.queue(MockResponse::raw(
            200,
            r#"{"usage":{"prompt_tokens":"not-a-number"}}"#,
        ));

        let result = service.create(&body()).await;
        assert!(matches!(result, Err(OpenRouterError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_create_inconsistent_usage_is_not_an_error() {
        let (service, transport) = service("", "");
        transport.queue(MockResponse::raw(
            200,
            r#"{"usage":{"prompt_tokens":1,"completion_tokens":1,"total_tokens":5}}"#,
        ));

        let response = service.create(&body()).await.unwrap();
        assert_eq!(response.usage.total_tokens, 5);
    }

    #[tokio::test]
    async fn test_bodies_not_logged_by_default() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let (service, transport) = service("", "");
        transport.queue(MockResponse::raw(
            200,
            r#"{"choices":[{"finish_reason":"stop","message":{"content":"PRIVATE_COMPLETION"}}]}"#,
        ));
        let request = serde_json::json!({
            "messages": [{"role": "user", "content": "PRIVATE_PROMPT"}]
        });
        service.create(&request).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("Outgoing request"));
        assert!(output.contains("Incoming response"));
        assert!(!output.contains("PRIVATE_PROMPT"));
        assert!(!output.contains("PRIVATE_COMPLETION"));
    }

    #[tokio::test]
    async fn test_bodies_logged_when_enabled() {
        let logs = CapturedLogs::default();
        let _guard = tracing::subscriber::set_default(logs.subscriber());

        let (service, transport) =
            service_with_logging("", "", LoggingConfig::new().log_bodies());
        transport.queue(MockResponse::raw(
            200,
            r#"{"choices":[{"finish_reason":"stop","message":{"content":"PRIVATE_COMPLETION"}}]}"#,
        ));
        let request = serde_json::json!({
            "messages": [{"role": "user", "content": "PRIVATE_PROMPT"}]
        });
        service.create(&request).await.unwrap();

        let output = logs.contents();
        assert!(output.contains("PRIVATE_PROMPT"));
        assert!(output.contains("PRIVATE_COMPLETION"));
        assert!(!output.contains("sk-or-v1-test"));
    }
}
