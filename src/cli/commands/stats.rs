//! Direct statistics commands
//!
//! Bypass routing and read the statistics API directly. Errors surface to the
//! caller unchanged, except agent discovery which lists nothing when offline.
//!
//! Usage:
//!   paddock standings [--year 2023] [--constructors]
//!   paddock races [--year 2023]
//!   paddock next-race
//!   paddock drivers [--year 2023]
//!   paddock agents

use serde_json::json;

use crate::cli::{CommandContext, Output};
use crate::query::normalizer::full_name;
use crate::query::{extract_drivers_array, extract_races_array, normalize_standings};
use crate::types::{Result, json_string_or, with_fallback};

pub async fn standings(ctx: &CommandContext, year: Option<i32>, constructors: bool, out: &Output) -> Result<()> {
    let season = year.unwrap_or_else(|| ctx.stats.current_season_year());
    let (raw, title) = if constructors {
        (
            ctx.stats.constructor_standings(Some(season)).await?,
            format!("{} Constructors' Championship", season),
        )
    } else {
        (
            ctx.stats.driver_standings(Some(season)).await?,
            format!("{} Drivers' Championship", season),
        )
    };

    out.standings(&title, &normalize_standings(&raw))
}

pub async fn races(ctx: &CommandContext, year: Option<i32>, out: &Output) -> Result<()> {
    let raw = ctx.stats.races(year).await?;
    let races = extract_races_array(&raw);

    if out.is_json() {
        return out.json(&races);
    }

    let season = year.unwrap_or_else(|| ctx.stats.current_season_year());
    out.section(&format!("{} Calendar", season));
    for race in &races {
        println!(
            "{:>3}  {:<28} {}",
            json_string_or(race, "round", "?"),
            json_string_or(race, "raceName", "Unknown"),
            json_string_or(race, "date", "TBA"),
        );
    }
    Ok(())
}

pub async fn next_race(ctx: &CommandContext, out: &Output) -> Result<()> {
    let race = ctx.stats.next_race().await?;
    out.payload("Next Race", &race)
}

pub async fn drivers(ctx: &CommandContext, year: Option<i32>, out: &Output) -> Result<()> {
    let raw = ctx.stats.drivers(year).await?;
    let drivers = extract_drivers_array(&raw);

    if out.is_json() {
        return out.json(&drivers);
    }

    let season = year.unwrap_or_else(|| ctx.stats.current_season_year());
    out.section(&format!("{} Drivers", season));
    for name in drivers.iter().filter_map(full_name) {
        println!("  {}", name);
    }
    Ok(())
}

pub async fn agents(ctx: &CommandContext, out: &Output) -> Result<()> {
    let online = ctx.agent.health_check().await;
    if !online && !out.is_json() {
        out.warning("Analysis service did not answer its health check");
    }

    // Discovery is informational; an offline service lists no agents
    let agents = with_fallback(
        ctx.agent.list_agents().await,
        json!({"agents": []}),
        "agent discovery",
    );
    out.payload("Available Agents", &agents)
}
