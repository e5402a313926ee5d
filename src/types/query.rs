//! Query input types: caller options and parsed routing hints.

use serde::{Deserialize, Serialize};

/// Named overrides accompanying a free-text query.
///
/// Forwarded verbatim to the analysis service as the `options` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    /// Season override for the analysis and for fallback standings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Conversation thread to continue on the analysis service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    /// Preferred specialist agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

impl QueryOptions {
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_thread(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }
}

/// Structured signals extracted from a free-text query, used only for routing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryHints {
    /// First plausible season year mentioned in the query
    pub year: Option<i32>,
    /// Recognized driver full names, deduplicated, in order of appearance
    pub drivers: Vec<String>,
    pub is_comparison: bool,
    pub is_career_stats: bool,
    pub is_race_query: bool,
    pub is_season_query: bool,
}

impl QueryHints {
    pub fn driver_count(&self) -> usize {
        self.drivers.len()
    }
}
