//! Remote Service Clients
//!
//! HTTP plumbing and typed gateways for the two upstream services.
//!
//! ## Modules
//!
//! - `transport`: timeout + single-retry wrapper over a pluggable HTTP backend
//! - `stats`: Direct Data Gateway for the statistics API
//! - `agent`: Agent Gateway for the multi-agent analysis service
//! - `cache`: short-lived response cache used by the statistics client

mod agent;
mod cache;
mod stats;
mod timeout;
pub(crate) mod transport;

pub use agent::{AgentApi, AgentClient, SharedAgent};
pub use cache::ResponseCache;
pub use stats::{SharedStats, StatsApi, StatsClient, select_current_race, select_next_race};
pub use timeout::with_timeout;

#[cfg(test)]
pub(crate) use agent::mock::MockAgent;
#[cfg(test)]
pub(crate) use stats::mock::MockStats;
pub use transport::{
    HttpMethod, HttpRequest, HttpTransport, RawResponse, ReqwestTransport, SharedTransport,
    Transport,
};

use tracing::warn;

use crate::types::{PaddockError, Result};

/// Validate a service base URL and strip its trailing slash.
///
/// Only http/https schemes are accepted; non-local hosts are logged.
pub(crate) fn normalize_base_url(endpoint: &str) -> Result<String> {
    let url = url::Url::parse(endpoint).map_err(|e| {
        PaddockError::Config(format!("Invalid endpoint URL '{}': {}", endpoint, e))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PaddockError::Config(format!(
            "Endpoint must use http or https scheme, got: {}",
            url.scheme()
        )));
    }

    if url.scheme() == "http"
        && let Some(host) = url.host_str()
        && !matches!(host, "localhost" | "127.0.0.1" | "::1")
    {
        warn!("Plain-http endpoint on non-local host: {}", host);
    }

    let mut result = url.to_string();
    if result.ends_with('/') {
        result.pop();
    }
    Ok(result)
}
