//! Direct-data fallback handlers
//!
//! Each handler answers one class of question from the statistics API alone
//! and returns a structured JSON payload. "Nothing to answer" situations
//! (too few drivers, unknown driver) are successful payloads with a `type`
//! tag and a suggestion; only upstream failures are `Err`.

use futures::future::join_all;
use serde_json::{Value, json};
use tracing::warn;

use crate::client::StatsApi;
use crate::constants::season;
use crate::query::normalizer::{extract_standings_array, filter_standings, matches_driver, normalize_entry};
use crate::types::{QueryHints, Result};

/// Standings side by side for two or more drivers
pub async fn compare_drivers(stats: &dyn StatsApi, hints: &QueryHints, year: Option<i32>) -> Result<Value> {
    if hints.driver_count() < 2 {
        return Ok(json!({
            "type": "insufficient_drivers",
            "message": "A comparison needs at least two recognized drivers.",
            "detectedDrivers": hints.drivers,
            "suggestion": "Try \"Compare Max Verstappen and Lewis Hamilton\".",
        }));
    }

    let season = year.unwrap_or_else(|| stats.current_season_year());
    let raw = stats.driver_standings(Some(season)).await?;
    let entries = extract_standings_array(&raw);
    let matched = filter_standings(&entries, &hints.drivers);

    Ok(json!({
        "type": "driver_comparison",
        "season": season,
        "comparison": {
            "requestedDrivers": hints.drivers,
            "standings": matched,
            "totalDrivers": entries.len(),
        },
    }))
}

/// Current standing of the first recognized driver
pub async fn single_driver(stats: &dyn StatsApi, hints: &QueryHints, year: Option<i32>) -> Result<Value> {
    let Some(driver) = hints.drivers.first() else {
        return Ok(json!({
            "type": "no_driver_detected",
            "message": "No known driver was found in the question.",
            "suggestion": "Mention a driver by name, e.g. \"How is Lando Norris doing?\".",
        }));
    };

    let season = year.unwrap_or_else(|| stats.current_season_year());
    let raw = stats.driver_standings(Some(season)).await?;
    let found = extract_standings_array(&raw)
        .iter()
        .find(|entry| matches_driver(entry, driver))
        .and_then(normalize_entry);

    Ok(match found {
        Some(entry) => json!({
            "type": "driver_stats",
            "season": season,
            "driver": entry,
        }),
        None => json!({
            "type": "driver_not_found",
            "season": season,
            "driver": driver,
            "message": format!("{} has no entry in the {} standings.", driver, season),
        }),
    })
}

/// Recent seasons for the requested drivers, tolerating per-season failures.
///
/// Always covers the current season and the prior ones, newest first, even
/// when the question names a year. A season that cannot be fetched
/// contributes an empty list and its error.
pub async fn career_stats(stats: &dyn StatsApi, hints: &QueryHints) -> Result<Value> {
    if hints.drivers.is_empty() {
        return Ok(json!({
            "type": "no_driver_detected",
            "message": "Career statistics need a driver name.",
            "suggestion": "Try \"Lewis Hamilton career stats\".",
        }));
    }

    let anchor = stats.current_season_year();
    let years: Vec<i32> = (0..season::CAREER_SEASONS)
        .map(|back| anchor - back)
        .filter(|y| *y >= season::FIRST_SEASON)
        .collect();

    let fetches = years.iter().map(|&y| async move {
        match stats.driver_standings(Some(y)).await {
            Ok(raw) => {
                let entries = extract_standings_array(&raw);
                json!({
                    "season": y,
                    "standings": filter_standings(&entries, &hints.drivers),
                })
            }
            Err(e) => {
                warn!(season = y, error = %e, "Career season unavailable");
                json!({
                    "season": y,
                    "standings": [],
                    "error": e.to_string(),
                })
            }
        }
    });
    let seasons = join_all(fetches).await;

    Ok(json!({
        "type": "career_stats",
        "drivers": hints.drivers,
        "seasons": seasons,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockStats;

    fn standings() -> Value {
        json!({"MRData": {"StandingsTable": {"StandingsLists": [{"DriverStandings": [
            {"position": "1", "points": "437", "wins": "9",
             "Driver": {"givenName": "Max", "familyName": "Verstappen"},
             "Constructors": [{"name": "Red Bull"}]},
            {"position": "2", "points": "374", "wins": "4",
             "Driver": {"givenName": "Lando", "familyName": "Norris"},
             "Constructors": [{"name": "McLaren"}]},
            {"position": "7", "points": "223", "wins": "2",
             "Driver": {"givenName": "Lewis", "familyName": "Hamilton"},
             "Constructors": [{"name": "Mercedes"}]}
        ]}]}}})
    }

    fn hints(drivers: &[&str]) -> QueryHints {
        QueryHints {
            drivers: drivers.iter().map(|d| d.to_string()).collect(),
            ..QueryHints::default()
        }
    }

    #[tokio::test]
    async fn test_comparison_needs_two_drivers() {
        let stats = MockStats::new(2024).with_standings(standings());
        let data = compare_drivers(&stats, &hints(&["Max Verstappen"]), None)
            .await
            .unwrap();
        assert_eq!(data["type"], "insufficient_drivers");
        assert!(stats.calls().is_empty());
    }

    #[tokio::test]
    async fn test_comparison_filters_standings() {
        let stats = MockStats::new(2024).with_standings(standings());
        let data = compare_drivers(&stats, &hints(&["Lewis Hamilton", "Max Verstappen"]), None)
            .await
            .unwrap();

        let comparison = &data["comparison"];
        assert_eq!(comparison["requestedDrivers"], json!(["Lewis Hamilton", "Max Verstappen"]));
        assert_eq!(comparison["totalDrivers"], 3);
        assert_eq!(comparison["standings"][0]["name"], "Max Verstappen");
        assert_eq!(comparison["standings"][1]["team"], "Mercedes");
        assert_eq!(stats.calls(), vec!["standings:2024"]);
    }

    #[tokio::test]
    async fn test_single_driver_outcomes() {
        let stats = MockStats::new(2024).with_standings(standings());

        let data = single_driver(&stats, &hints(&["Lando Norris"]), None).await.unwrap();
        assert_eq!(data["type"], "driver_stats");
        assert_eq!(data["driver"]["points"], 374.0);

        let data = single_driver(&stats, &hints(&["Oscar Piastri"]), Some(2023)).await.unwrap();
        assert_eq!(data["type"], "driver_not_found");
        assert_eq!(data["season"], 2023);

        let data = single_driver(&stats, &hints(&[]), None).await.unwrap();
        assert_eq!(data["type"], "no_driver_detected");
    }

    #[tokio::test]
    async fn test_single_driver_propagates_upstream_failure() {
        let stats = MockStats::new(2024);
        assert!(single_driver(&stats, &hints(&["Lando Norris"]), None).await.is_err());
    }

    #[tokio::test]
    async fn test_career_stats_tolerates_failed_season() {
        let stats = MockStats::new(2024)
            .with_standings(standings())
            .failing_standings_for(&[2023]);

        let data = career_stats(&stats, &hints(&["Lewis Hamilton"])).await.unwrap();
        let seasons = data["seasons"].as_array().unwrap();
        assert_eq!(seasons.len(), 3);
        assert_eq!(seasons[0]["season"], 2024);
        assert_eq!(seasons[0]["standings"][0]["name"], "Lewis Hamilton");
        assert_eq!(seasons[1]["season"], 2023);
        assert_eq!(seasons[1]["standings"], json!([]));
        assert!(seasons[1]["error"].is_string());
        assert_eq!(seasons[2]["season"], 2022);
        assert_eq!(stats.count("standings"), 3);
    }

    #[tokio::test]
    async fn test_career_stats_stops_at_first_season() {
        let stats = MockStats::new(1951).with_standings(standings());
        let data = career_stats(&stats, &hints(&["Max Verstappen"])).await.unwrap();
        assert_eq!(data["seasons"].as_array().unwrap().len(), 2);
    }
}
