//! HTTP transport implementation.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;

use super::{SharedTimeout, TransportError};

/// HTTP method.
///
/// Every OpenRouter endpoint this client calls is a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// POST request.
    Post,
}

/// HTTP request representation.
///
/// `url` is absolute; the client resolves paths against its base URL before
/// handing the request over.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a new POST request.
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP transport trait.
///
/// Implementations must allow the timeout to be changed through a shared
/// reference: the client builder reconfigures whatever handle it holds, and
/// that handle may also be held by the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Returns the timeout applied to each request.
    fn timeout(&self) -> Duration;

    /// Replaces the timeout applied to each request.
    fn set_timeout(&self, timeout: Duration);
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransportImpl {
    client: Client,
    timeout: SharedTimeout,
}

impl HttpTransportImpl {
    /// Creates a new HTTP transport.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self::with_client(client, timeout))
    }

    /// Wraps an existing reqwest client.
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout: SharedTimeout::new(timeout),
        }
    }
}

#[async_trait]
impl HttpTransport for HttpTransportImpl {
    #[instrument(skip(self, request), fields(method = ?request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let timeout = self.timeout.get();

        let mut req_builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
        };

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout { timeout }
            } else if e.is_connect() {
                TransportError::Connection {
                    message: e.to_string(),
                }
            } else {
                TransportError::InvalidResponse {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout { timeout }
                } else {
                    TransportError::InvalidResponse {
                        message: e.to_string(),
                    }
                }
            })?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn timeout(&self) -> Duration {
        self.timeout.get()
    }

    fn set_timeout(&self, timeout: Duration) {
        self.timeout.set(timeout);
    }
}

impl std::fmt::Debug for HttpTransportImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportImpl")
            .field("timeout", &self.timeout.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_request_builders() {
        let request = HttpRequest::post("https://openrouter.ai/api/v1/chat/completions")
            .with_header("X-Title", "demo")
            .with_body(b"{}".to_vec());

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.headers.get("X-Title"), Some(&"demo".to_string()));
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));

        let request = HttpRequest::post("https://openrouter.ai/api/v1/chat/completions");
        assert!(request.body.is_none());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_response_is_success() {
        let response = HttpResponse {
            status: 204,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_success());

        let response = HttpResponse {
            status: 429,
            ..response
        };
        assert!(!response.is_success());
    }

    #[test]
    fn test_set_timeout_through_shared_reference() {
        let transport = HttpTransportImpl::new(Duration::from_secs(180)).unwrap();
        transport.set_timeout(Duration::from_secs(5));
        assert_eq!(transport.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_send_against_local_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-or-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":"gen-1"}"#))
            .mount(&server)
            .await;

        let transport = HttpTransportImpl::new(Duration::from_secs(5)).unwrap();
        let request = HttpRequest::post(format!("{}/chat/completions", server.uri()))
            .with_header("Authorization", "Bearer sk-or-test")
            .with_body(b"{}".to_vec());

        let response = transport.send(request).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, br#"{"id":"gen-1"}"#.to_vec());
    }

    #[tokio::test]
    async fn test_send_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let transport = HttpTransportImpl::new(Duration::from_millis(100)).unwrap();
        let request = HttpRequest::post(server.uri()).with_body(b"{}".to_vec());
        let result = transport.send(request).await;

        match result {
            Err(TransportError::Timeout { timeout }) => {
                assert_eq!(timeout, Duration::from_millis(100));
            }
            other => panic!("Expected timeout, got {:?}", other),
        }
    }
}
