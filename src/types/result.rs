//! Result envelopes crossing the client boundary.
//!
//! `AgentResult` carries the analysis service outcome as data so the router can
//! branch on it. `QueryResult` is the only shape handed to callers; its
//! constructors keep `success` consistent with `data`/`error`.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

// =============================================================================
// Agent Result
// =============================================================================

/// Success/failure envelope returned by the agent gateway. Never an `Err`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResult {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AgentResult {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Split into payload or error message
    pub fn into_outcome(self) -> std::result::Result<Value, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self
                .error
                .unwrap_or_else(|| "agent returned no data".to_string())),
        }
    }
}

// =============================================================================
// Routing Mode
// =============================================================================

/// Direct-data handler chosen when the agent path fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackHandler {
    Comparison,
    CareerStats,
    Standings,
    Season,
    Driver,
    NextRace,
    CurrentRace,
    CurrentSeason,
    /// Current-season payload served after the chosen handler itself failed
    LastResort,
}

impl FallbackHandler {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Comparison => "comparison",
            Self::CareerStats => "career_stats",
            Self::Standings => "standings",
            Self::Season => "season",
            Self::Driver => "driver",
            Self::NextRace => "next_race",
            Self::CurrentRace => "current_race",
            Self::CurrentSeason => "current_season",
            Self::LastResort => "last_resort",
        }
    }
}

impl std::fmt::Display for FallbackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Path that produced a `QueryResult`; renders as `agent` or `fallback:<handler>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMode {
    Agent,
    Fallback(FallbackHandler),
}

impl std::fmt::Display for RouteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::Fallback(handler) => write!(f, "fallback:{}", handler),
        }
    }
}

impl Serialize for RouteMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Query Result
// =============================================================================

/// Final, display-ready outcome of a routed query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    query: String,
    mode: RouteMode,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// Why the agent path was abandoned
    #[serde(skip_serializing_if = "Option::is_none")]
    agent_error: Option<String>,
    /// Why the chosen fallback handler was abandoned for the last resort
    #[serde(skip_serializing_if = "Option::is_none")]
    handler_error: Option<String>,
    timestamp: DateTime<Utc>,
}

impl QueryResult {
    pub fn succeeded(query: impl Into<String>, mode: RouteMode, data: Value) -> Self {
        Self {
            query: query.into(),
            mode,
            success: true,
            data: Some(data),
            error: None,
            agent_error: None,
            handler_error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(query: impl Into<String>, mode: RouteMode, error: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            mode,
            success: false,
            data: None,
            error: Some(error.into()),
            agent_error: None,
            handler_error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_agent_error(mut self, error: Option<String>) -> Self {
        self.agent_error = error;
        self
    }

    pub fn with_handler_error(mut self, error: impl Into<String>) -> Self {
        self.handler_error = Some(error.into());
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> RouteMode {
        self.mode
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn agent_error(&self) -> Option<&str> {
        self.agent_error.as_deref()
    }

    pub fn handler_error(&self) -> Option<&str> {
        self.handler_error.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_mode_display() {
        assert_eq!(RouteMode::Agent.to_string(), "agent");
        assert_eq!(
            RouteMode::Fallback(FallbackHandler::Comparison).to_string(),
            "fallback:comparison"
        );
        assert_eq!(
            RouteMode::Fallback(FallbackHandler::CareerStats).to_string(),
            "fallback:career_stats"
        );
    }

    #[test]
    fn test_query_result_success_invariant() {
        let ok = QueryResult::succeeded("q", RouteMode::Agent, json!({"a": 1}));
        assert!(ok.is_success());
        assert!(ok.data().is_some());
        assert!(ok.error().is_none());

        let failed = QueryResult::failed(
            "q",
            RouteMode::Fallback(FallbackHandler::LastResort),
            "stats API down",
        );
        assert!(!failed.is_success());
        assert!(failed.data().is_none());
        assert_eq!(failed.error(), Some("stats API down"));
    }

    #[test]
    fn test_query_result_serializes_mode_as_string() {
        let result = QueryResult::succeeded(
            "next race",
            RouteMode::Fallback(FallbackHandler::NextRace),
            json!({}),
        )
        .with_agent_error(Some("timeout".into()));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["mode"], "fallback:next_race");
        assert_eq!(value["agentError"], "timeout");
        assert!(value.get("error").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_agent_result_outcome() {
        assert_eq!(
            AgentResult::ok(json!({"response": "hi"})).into_outcome(),
            Ok(json!({"response": "hi"}))
        );
        assert_eq!(
            AgentResult::failed("asleep").into_outcome(),
            Err("asleep".to_string())
        );
    }
}
