//! Smart Router
//!
//! Agent-first query answering with a direct-data fallback.
//!
//! ## Strategy
//!
//! 1. Ask the analysis service once; a successful answer is returned as-is
//! 2. Otherwise parse the query and pick exactly one fallback handler
//! 3. If that handler fails, serve the current season as a last resort
//! 4. Every outcome, including total failure, is a [`QueryResult`]
//!
//! Classification order: comparison, career stats, season, single driver,
//! race, default.

pub mod handlers;

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::client::{SharedAgent, SharedStats};
use crate::query::{DriverCache, QueryParser};
use crate::types::{FallbackHandler, QueryHints, QueryOptions, QueryResult, Result, RouteMode};

/// Pick the fallback handler for a query the agent could not answer.
pub fn classify(query: &str, hints: &QueryHints) -> FallbackHandler {
    let lowered = query.to_lowercase();
    let mentions_driver = lowered.contains("driver");

    if hints.is_comparison && (mentions_driver || hints.driver_count() > 1) {
        FallbackHandler::Comparison
    } else if hints.is_career_stats {
        FallbackHandler::CareerStats
    } else if hints.is_season_query {
        if hints.year.is_some() || lowered.contains("standings") || lowered.contains("championship")
        {
            FallbackHandler::Standings
        } else {
            FallbackHandler::Season
        }
    } else if hints.driver_count() == 1 || mentions_driver {
        FallbackHandler::Driver
    } else if hints.is_race_query {
        if lowered.contains("next") {
            FallbackHandler::NextRace
        } else {
            FallbackHandler::CurrentRace
        }
    } else {
        FallbackHandler::CurrentSeason
    }
}

pub struct SmartRouter {
    agent: SharedAgent,
    stats: SharedStats,
    parser: QueryParser,
}

impl SmartRouter {
    pub fn new(agent: SharedAgent, stats: SharedStats, drivers: Arc<DriverCache>) -> Self {
        Self {
            agent,
            stats,
            parser: QueryParser::new(drivers),
        }
    }

    /// Answer a free-text query. Always resolves to a `QueryResult`.
    #[instrument(skip(self, options), fields(query_len = query.len()))]
    pub async fn smart_query(&self, query: &str, options: &QueryOptions) -> QueryResult {
        let agent_error = match self.agent.analyze(query, options).await.into_outcome() {
            Ok(data) => {
                info!("Answered by analysis service");
                return QueryResult::succeeded(query, RouteMode::Agent, data);
            }
            Err(error) => {
                warn!(%error, "Analysis service unavailable, falling back to direct data");
                error
            }
        };

        let hints = self.parser.parse(query).await;
        let handler = classify(query, &hints);
        info!(%handler, drivers = hints.driver_count(), year = ?hints.year, "Fallback route selected");

        match self.dispatch(handler, &hints, options).await {
            Ok(data) => QueryResult::succeeded(query, RouteMode::Fallback(handler), data)
                .with_agent_error(Some(agent_error)),
            Err(handler_error) => {
                warn!(%handler, error = %handler_error, "Fallback handler failed, serving current season");
                self.last_resort(query, agent_error, handler_error.to_string())
                    .await
            }
        }
    }

    async fn dispatch(
        &self,
        handler: FallbackHandler,
        hints: &QueryHints,
        options: &QueryOptions,
    ) -> Result<Value> {
        let stats = self.stats.as_ref();
        let year = hints.year.or(options.year);
        debug!(%handler, ?year, "dispatching");

        match handler {
            FallbackHandler::Comparison => handlers::compare_drivers(stats, hints, year).await,
            FallbackHandler::CareerStats => handlers::career_stats(stats, hints).await,
            FallbackHandler::Standings => stats.driver_standings(year).await,
            FallbackHandler::Season => stats.season(options.year).await,
            FallbackHandler::Driver => handlers::single_driver(stats, hints, year).await,
            FallbackHandler::NextRace => stats.next_race().await,
            FallbackHandler::CurrentRace => stats.current_race().await,
            FallbackHandler::CurrentSeason | FallbackHandler::LastResort => {
                stats.current_season().await
            }
        }
    }

    async fn last_resort(&self, query: &str, agent_error: String, handler_error: String) -> QueryResult {
        let mode = RouteMode::Fallback(FallbackHandler::LastResort);
        let result = match self.stats.current_season().await {
            Ok(data) => QueryResult::succeeded(query, mode, data),
            Err(e) => {
                warn!(error = %e, "Last-resort season fetch failed");
                QueryResult::failed(
                    query,
                    mode,
                    format!("Statistics are unavailable right now: {}", e),
                )
            }
        };

        result
            .with_agent_error(Some(agent_error))
            .with_handler_error(handler_error)
    }
}
