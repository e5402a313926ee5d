//! Agent Gateway
//!
//! Client for the remote multi-agent analysis service. `analyze` never returns
//! an `Err`: transport failures, non-2xx statuses and explicit service-side
//! failures all become `AgentResult::failed` so routing can branch on data.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::normalize_base_url;
use super::transport::{HttpRequest, SharedTransport, Transport};
use crate::config::Config;
use crate::types::{AgentResult, PaddockError, QueryOptions, Result, json_string};

#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Ask the analysis service a free-text question
    async fn analyze(&self, query: &str, options: &QueryOptions) -> AgentResult;

    /// Specialized agents the service exposes
    async fn list_agents(&self) -> Result<Value>;

    /// Whether the service is reachable and awake
    async fn health_check(&self) -> bool;
}

pub type SharedAgent = Arc<dyn AgentApi>;

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    query: &'a str,
    options: &'a QueryOptions,
}

/// HTTP client for the analysis service
pub struct AgentClient {
    base_url: String,
    transport: Transport,
    /// Analysis may run several reasoning steps remotely
    analyze_timeout: Duration,
    /// Discovery and health calls
    status_timeout: Duration,
}

impl AgentClient {
    pub fn new(
        base_url: &str,
        transport: Transport,
        analyze_timeout: Duration,
        status_timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            transport,
            analyze_timeout,
            status_timeout,
        })
    }

    pub fn from_config(config: &Config, http: SharedTransport) -> Result<Self> {
        let transport = Transport::new(http).with_retry_delay(config.api.retry_delay());
        Self::new(
            &config.api.agent_base_url,
            transport,
            config.api.agent_timeout(),
            config.api.timeout(),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Attach client-side metadata to a successful service body
fn with_client_metadata(body: Value, request_id: Uuid, elapsed: Duration) -> Value {
    let metadata = json!({
        "requestId": request_id.to_string(),
        "timestamp": Utc::now().to_rfc3339(),
        "durationMs": elapsed.as_millis() as u64,
    });

    match body {
        Value::Object(mut map) => {
            map.insert("clientMetadata".to_string(), metadata);
            Value::Object(map)
        }
        other => json!({ "response": other, "clientMetadata": metadata }),
    }
}

/// Service-reported failure (`{"success": false, "error": ...}`), if any
fn service_failure(body: &Value) -> Option<PaddockError> {
    if body.get("success").and_then(Value::as_bool) != Some(false) {
        return None;
    }
    let message = json_string(body, "error")
        .or_else(|| json_string(body, "message"))
        .unwrap_or_else(|| "analysis service reported failure".to_string());
    Some(PaddockError::Agent(message))
}

#[async_trait]
impl AgentApi for AgentClient {
    #[instrument(skip(self, options), fields(query_len = query.len()))]
    async fn analyze(&self, query: &str, options: &QueryOptions) -> AgentResult {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let body = match serde_json::to_value(AnalyzeRequest { query, options }) {
            Ok(body) => body,
            Err(e) => return AgentResult::failed(format!("could not encode request: {}", e)),
        };

        let request = HttpRequest::post(self.url("/agents/analyze"), body, self.analyze_timeout);

        match self.transport.request(request).await {
            Ok(body) => {
                if let Some(error) = service_failure(&body) {
                    warn!(%request_id, %error, kind = %error.kind(), "Analysis service declined query");
                    return AgentResult::failed(error.to_string());
                }
                info!(
                    %request_id,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Analysis completed"
                );
                AgentResult::ok(with_client_metadata(body, request_id, start.elapsed()))
            }
            Err(err) => {
                warn!(%request_id, error = %err, kind = %err.kind(), "Analysis request failed");
                AgentResult::failed(err.to_string())
            }
        }
    }

    async fn list_agents(&self) -> Result<Value> {
        self.transport
            .request(HttpRequest::get(self.url("/agents"), self.status_timeout))
            .await
    }

    async fn health_check(&self) -> bool {
        match self
            .transport
            .request(HttpRequest::get(self.url("/health"), self.status_timeout))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("Analysis service not available: {}", e);
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::tests::MockTransport;
    use crate::client::transport::{HttpMethod, RawResponse};
    use std::sync::atomic::Ordering;

    fn client(mock: Arc<MockTransport>) -> AgentClient {
        let transport = Transport::new(mock).with_retry_delay(Duration::from_millis(1));
        AgentClient::new(
            "http://agents.local/api",
            transport,
            Duration::from_secs(45),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_analyze_posts_query_and_options() {
        let mock = Arc::new(MockTransport::new(vec![Ok(RawResponse::ok(
            json!({"response": "Verstappen leads by 60 points"}),
        ))]));
        let options = QueryOptions::default().with_year(2024).with_thread("t-1");

        let result = client(mock.clone()).analyze("who leads?", &options).await;

        assert!(result.is_success());
        let data = result.data().unwrap();
        assert_eq!(data["response"], "Verstappen leads by 60 points");
        assert!(data["clientMetadata"]["requestId"].is_string());

        let requests = mock.requests.lock().unwrap();
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, "http://agents.local/api/agents/analyze");
        assert_eq!(requests[0].timeout, Duration::from_secs(45));
        assert_eq!(
            requests[0].body,
            Some(json!({"query": "who leads?", "options": {"year": 2024, "threadId": "t-1"}}))
        );
    }

    #[tokio::test]
    async fn test_analyze_failure_is_data() {
        let mock = Arc::new(MockTransport::new(vec![
            Err(PaddockError::network("x", "connection refused")),
            Err(PaddockError::network("x", "connection refused")),
        ]));
        let result = client(mock.clone()).analyze("q", &QueryOptions::default()).await;
        assert!(!result.is_success());
        assert!(result.error().unwrap().contains("connection refused"));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_analyze_http_error_is_data() {
        let mock = Arc::new(MockTransport::new(vec![Ok(RawResponse {
            status: 502,
            body: Value::String("Bad Gateway".into()),
        })]));
        let result = client(mock).analyze("q", &QueryOptions::default()).await;
        assert!(result.error().unwrap().contains("502"));
    }

    #[tokio::test]
    async fn test_service_reported_failure() {
        let mock = Arc::new(MockTransport::new(vec![Ok(RawResponse::ok(
            json!({"success": false, "error": "no agent available"}),
        ))]));
        let result = client(mock).analyze("q", &QueryOptions::default()).await;
        assert_eq!(result.error(), Some("Agent service error: no agent available"));
    }

    #[test]
    fn test_non_object_body_wrapped() {
        let data = with_client_metadata(json!("plain text"), Uuid::new_v4(), Duration::ZERO);
        assert_eq!(data["response"], "plain text");
        assert_eq!(data["clientMetadata"]["durationMs"], 0);
    }

    #[tokio::test]
    async fn test_health_check_never_errors() {
        let mock = Arc::new(MockTransport::new(vec![
            Ok(RawResponse::ok(json!({"status": "ok"}))),
            Ok(RawResponse {
                status: 503,
                body: Value::Null,
            }),
        ]));
        let agent = client(mock.clone());
        assert!(agent.health_check().await);
        assert!(!agent.health_check().await);
        assert_eq!(
            mock.urls(),
            vec!["http://agents.local/api/health", "http://agents.local/api/health"]
        );
    }
}
