//! HTTP Transport
//!
//! Single entry point for every remote call the client makes.
//!
//! ## Strategy
//!
//! 1. Wrap each attempt in a per-request timeout
//! 2. Treat non-2xx responses as `PaddockError::Http` (never retried)
//! 3. Retry network-class failures (connect, abort, timeout) exactly once
//!    after a fixed delay

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use serde_json::Value;
use tracing::{debug, warn};

use super::timeout::with_timeout;
use crate::constants::network as net_constants;
use crate::types::{PaddockError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// A fully-resolved request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: None,
            timeout,
        }
    }

    pub fn post(url: impl Into<String>, body: Value, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body: Some(body),
            timeout,
        }
    }

    fn operation(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// Status and decoded body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Value,
}

impl RawResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP attempt. Non-2xx statuses are returned as responses, not errors.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse>;
}

/// Shared transport type for gateways
pub type SharedTransport = Arc<dyn HttpTransport>;

// =============================================================================
// reqwest implementation
// =============================================================================

/// Production transport backed by `reqwest`
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("paddock/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PaddockError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<RawResponse> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                PaddockError::timeout(request.operation(), request.timeout)
            } else {
                PaddockError::network(&request.url, e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| PaddockError::network(&request.url, e.to_string()))?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(body) => body,
                // Error pages are often HTML; keep them as text for the error message
                Err(_) if !(200..300).contains(&status) => Value::String(text),
                Err(e) => {
                    return Err(PaddockError::parse(
                        &request.url,
                        format!("invalid JSON body: {}", e),
                    ));
                }
            }
        };

        Ok(RawResponse { status, body })
    }
}

// =============================================================================
// Retrying transport
// =============================================================================

/// Timeout + single-retry wrapper around an [`HttpTransport`]
#[derive(Clone)]
pub struct Transport {
    inner: SharedTransport,
    retry_delay: Duration,
}

impl Transport {
    pub fn new(inner: SharedTransport) -> Self {
        Self {
            inner,
            retry_delay: Duration::from_millis(net_constants::RETRY_DELAY_MS),
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Perform the request, returning the decoded body of a 2xx response.
    pub async fn request(&self, request: HttpRequest) -> Result<Value> {
        let backoff = ConstantBuilder::default()
            .with_delay(self.retry_delay)
            .with_max_times(net_constants::MAX_NETWORK_RETRIES);

        (|| self.attempt(&request))
            .retry(backoff)
            .when(PaddockError::is_retryable)
            .notify(|err: &PaddockError, delay: Duration| {
                warn!(
                    url = %request.url,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Network failure, retrying once"
                );
            })
            .await
    }

    async fn attempt(&self, request: &HttpRequest) -> Result<Value> {
        let operation = request.operation();
        debug!(method = %request.method, url = %request.url, "HTTP request");

        let response = with_timeout(request.timeout, self.inner.send(request), &operation).await?;

        if !response.is_success() {
            let body = match response.body {
                Value::String(text) => text,
                other => other.to_string(),
            };
            return Err(PaddockError::http(response.status, &request.url, body));
        }

        Ok(response.body)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted transport: pops one outcome per call, recording requests
    pub(crate) struct MockTransport {
        script: Mutex<VecDeque<Result<RawResponse>>>,
        pub(crate) requests: Mutex<Vec<HttpRequest>>,
        pub(crate) calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl MockTransport {
        pub(crate) fn new(script: Vec<Result<RawResponse>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                requests: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                delay: None,
            }
        }

        fn slow(delay: Duration) -> Self {
            let mut mock = Self::new(vec![
                Ok(RawResponse::ok(json!({}))),
                Ok(RawResponse::ok(json!({}))),
            ]);
            mock.delay = Some(delay);
            mock
        }

        pub(crate) fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn send(&self, request: &HttpRequest) -> Result<RawResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(PaddockError::network(&request.url, "script exhausted")))
        }
    }

    fn transport(mock: Arc<MockTransport>) -> Transport {
        Transport::new(mock).with_retry_delay(Duration::from_millis(1))
    }

    fn get() -> HttpRequest {
        HttpRequest::get("http://stats/races/2024", Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_success_single_attempt() {
        let mock = Arc::new(MockTransport::new(vec![Ok(RawResponse::ok(json!({"ok": 1})))]));
        let body = transport(mock.clone()).request(get()).await.unwrap();
        assert_eq!(body, json!({"ok": 1}));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_network_error_retried_once_then_succeeds() {
        let mock = Arc::new(MockTransport::new(vec![
            Err(PaddockError::network("http://stats", "connection reset")),
            Ok(RawResponse::ok(json!([1, 2]))),
        ]));
        let body = transport(mock.clone()).request(get()).await.unwrap();
        assert_eq!(body, json!([1, 2]));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_network_error_retried_exactly_once() {
        let mock = Arc::new(MockTransport::new(vec![
            Err(PaddockError::network("http://stats", "refused")),
            Err(PaddockError::network("http://stats", "refused")),
            Ok(RawResponse::ok(json!({}))),
        ]));
        let err = transport(mock.clone()).request(get()).await.unwrap_err();
        assert!(matches!(err, PaddockError::Network { .. }));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_http_error_not_retried() {
        let mock = Arc::new(MockTransport::new(vec![
            Ok(RawResponse {
                status: 503,
                body: Value::String("service asleep".into()),
            }),
            Ok(RawResponse::ok(json!({}))),
        ]));
        let err = transport(mock.clone()).request(get()).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("service asleep"));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_is_retried() {
        let mock = Arc::new(MockTransport::slow(Duration::from_millis(200)));
        let request = HttpRequest::get("http://stats/slow", Duration::from_millis(20));
        let err = transport(mock.clone()).request(request).await.unwrap_err();
        assert!(matches!(err, PaddockError::Timeout { .. }));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_request_constructors() {
        let post = HttpRequest::post("http://a/agents/analyze", json!({"q": 1}), Duration::from_secs(45));
        assert_eq!(post.method, HttpMethod::Post);
        assert_eq!(post.operation(), "POST http://a/agents/analyze");
        assert!(get().body.is_none());
    }
}
