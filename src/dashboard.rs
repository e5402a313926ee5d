//! Dashboard snapshot
//!
//! Loads the overview panels concurrently. Every panel settles on its own:
//! a failing or slow branch leaves its panel empty and records the error
//! without holding back the others.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::client::{AgentApi, StatsApi};
use crate::query::normalize_standings;
use crate::types::{Result, StandingEntry};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelError {
    pub panel: &'static str,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub agent_online: bool,
    pub season: Option<Value>,
    pub next_race: Option<Value>,
    pub standings: Vec<StandingEntry>,
    pub errors: Vec<PanelError>,
    pub loaded_at: DateTime<Utc>,
}

impl Dashboard {
    pub async fn load(agent: &dyn AgentApi, stats: &dyn StatsApi) -> Self {
        let (agent_online, season, next_race, standings) = futures::join!(
            agent.health_check(),
            stats.current_season(),
            stats.next_race(),
            stats.driver_standings(None),
        );

        let mut errors = Vec::new();
        let season = settle("season", season, &mut errors);
        let next_race = settle("next_race", next_race, &mut errors);
        let standings = settle("standings", standings, &mut errors)
            .map(|raw| normalize_standings(&raw))
            .unwrap_or_default();

        info!(
            agent_online,
            standings = standings.len(),
            failed_panels = errors.len(),
            "Dashboard loaded"
        );

        Self {
            agent_online,
            season,
            next_race,
            standings,
            errors,
            loaded_at: Utc::now(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

fn settle<T>(panel: &'static str, result: Result<T>, errors: &mut Vec<PanelError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(panel, error = %e, "Dashboard panel unavailable");
            errors.push(PanelError {
                panel,
                error: e.to_string(),
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{MockAgent, MockStats};
    use serde_json::json;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_failing_panels_do_not_block_others() {
        let agent = MockAgent::failing("down");
        let stats = MockStats::new(2024)
            .with_season(json!({"season": "2024"}))
            .with_standings(json!({"standings": [
                {"name": "Max Verstappen", "position": 1, "points": 437, "team": "Red Bull"}
            ]}));

        let dashboard = Dashboard::load(&agent, &stats).await;

        assert!(!dashboard.agent_online);
        assert_eq!(dashboard.season, Some(json!({"season": "2024"})));
        assert!(dashboard.next_race.is_none());
        assert_eq!(dashboard.standings[0].name, "Max Verstappen");
        assert_eq!(dashboard.errors.len(), 1);
        assert_eq!(dashboard.errors[0].panel, "next_race");
        assert!(!dashboard.is_complete());
    }

    #[tokio::test]
    async fn test_panels_load_concurrently() {
        let agent = MockAgent::answering(json!({}));
        let stats = MockStats::new(2024)
            .with_season(json!({}))
            .with_races(json!({"races": [{"raceName": "Monza", "date": "2024-09-01"}]}))
            .with_standings(json!([]))
            .with_delay(Duration::from_millis(100));

        let start = Instant::now();
        let dashboard = Dashboard::load(&agent, &stats).await;

        assert!(dashboard.is_complete());
        assert!(dashboard.agent_online);
        assert_eq!(dashboard.next_race.unwrap()["raceName"], "Monza");
        // Three delayed fetches in parallel, not in sequence
        assert!(start.elapsed() < Duration::from_millis(280));
    }
}
