//! Response Normalizer
//!
//! The statistics API wraps its lists under several envelopes depending on the
//! endpoint and the proxy in front of it. Each known envelope is a small typed
//! extractor; a list of them is tried in priority order and the first hit wins.
//! Unknown shapes degrade to an empty list and never error.
//!
//! ## Standings shapes (priority order)
//!
//! 1. `data.MRData.StandingsTable.StandingsLists[0].{Driver,Constructor}Standings`
//! 2. `MRData.StandingsTable.StandingsLists[0].{Driver,Constructor}Standings`
//! 3. `data.standings`
//! 4. `standings`
//! 5. `data` as an array
//! 6. the response itself as an array

use serde_json::Value;
use tracing::debug;

use crate::types::{StandingEntry, json_number_or, json_path, json_string};

/// A named envelope extractor
#[derive(Clone, Copy)]
pub struct Shape {
    pub name: &'static str,
    pub extract: fn(&Value) -> Option<&Vec<Value>>,
}

impl Shape {
    const fn new(name: &'static str, extract: fn(&Value) -> Option<&Vec<Value>>) -> Self {
        Self { name, extract }
    }
}

// =============================================================================
// Standings
// =============================================================================

fn mrdata_standings(root: &Value) -> Option<&Vec<Value>> {
    let list = json_path(root, &["MRData", "StandingsTable", "StandingsLists", "0"])?;
    list.get("DriverStandings")
        .or_else(|| list.get("ConstructorStandings"))?
        .as_array()
}

fn wrapped_mrdata_standings(root: &Value) -> Option<&Vec<Value>> {
    mrdata_standings(root.get("data")?)
}

fn data_standings(root: &Value) -> Option<&Vec<Value>> {
    json_path(root, &["data", "standings"])?.as_array()
}

fn standings_field(root: &Value) -> Option<&Vec<Value>> {
    root.get("standings")?.as_array()
}

fn data_array(root: &Value) -> Option<&Vec<Value>> {
    root.get("data")?.as_array()
}

fn top_level_array(root: &Value) -> Option<&Vec<Value>> {
    root.as_array()
}

pub const STANDINGS_SHAPES: &[Shape] = &[
    Shape::new("data.MRData.StandingsTable", wrapped_mrdata_standings),
    Shape::new("MRData.StandingsTable", mrdata_standings),
    Shape::new("data.standings", data_standings),
    Shape::new("standings", standings_field),
    Shape::new("data[]", data_array),
    Shape::new("[]", top_level_array),
];

// =============================================================================
// Races
// =============================================================================

fn mrdata_races(root: &Value) -> Option<&Vec<Value>> {
    json_path(root, &["MRData", "RaceTable", "Races"])?.as_array()
}

fn wrapped_mrdata_races(root: &Value) -> Option<&Vec<Value>> {
    mrdata_races(root.get("data")?)
}

fn data_races(root: &Value) -> Option<&Vec<Value>> {
    json_path(root, &["data", "races"])?.as_array()
}

fn races_field(root: &Value) -> Option<&Vec<Value>> {
    root.get("races")?.as_array()
}

pub const RACE_SHAPES: &[Shape] = &[
    Shape::new("data.MRData.RaceTable", wrapped_mrdata_races),
    Shape::new("MRData.RaceTable", mrdata_races),
    Shape::new("data.races", data_races),
    Shape::new("races", races_field),
    Shape::new("data[]", data_array),
    Shape::new("[]", top_level_array),
];

// =============================================================================
// Drivers
// =============================================================================

fn mrdata_drivers(root: &Value) -> Option<&Vec<Value>> {
    json_path(root, &["MRData", "DriverTable", "Drivers"])?.as_array()
}

fn wrapped_mrdata_drivers(root: &Value) -> Option<&Vec<Value>> {
    mrdata_drivers(root.get("data")?)
}

fn data_drivers(root: &Value) -> Option<&Vec<Value>> {
    json_path(root, &["data", "drivers"])?.as_array()
}

fn drivers_field(root: &Value) -> Option<&Vec<Value>> {
    root.get("drivers")?.as_array()
}

pub const DRIVER_SHAPES: &[Shape] = &[
    Shape::new("data.MRData.DriverTable", wrapped_mrdata_drivers),
    Shape::new("MRData.DriverTable", mrdata_drivers),
    Shape::new("data.drivers", data_drivers),
    Shape::new("drivers", drivers_field),
    Shape::new("data[]", data_array),
    Shape::new("[]", top_level_array),
];

// =============================================================================
// Extraction
// =============================================================================

/// Return the first array any shape finds, with the shape's name
pub fn first_match<'a>(raw: &'a Value, shapes: &[Shape]) -> Option<(&'static str, &'a Vec<Value>)> {
    shapes
        .iter()
        .find_map(|shape| (shape.extract)(raw).map(|list| (shape.name, list)))
}

fn extract_with(raw: &Value, shapes: &[Shape], what: &str) -> Vec<Value> {
    match first_match(raw, shapes) {
        Some((shape, list)) => {
            debug!(shape, count = list.len(), "extracted {}", what);
            list.clone()
        }
        None => {
            if !raw.is_null() {
                debug!("no {} array found in response; treating as empty", what);
            }
            Vec::new()
        }
    }
}

/// Raw standings entries from any known envelope; `[]` when none matches.
pub fn extract_standings_array(raw: &Value) -> Vec<Value> {
    extract_with(raw, STANDINGS_SHAPES, "standings")
}

/// Raw race entries from any known envelope; `[]` when none matches.
pub fn extract_races_array(raw: &Value) -> Vec<Value> {
    extract_with(raw, RACE_SHAPES, "races")
}

/// Raw driver entries from any known envelope; `[]` when none matches.
pub fn extract_drivers_array(raw: &Value) -> Vec<Value> {
    extract_with(raw, DRIVER_SHAPES, "drivers")
}

// =============================================================================
// Entry normalization
// =============================================================================

/// Given and family name of the driver (or constructor) an entry describes.
///
/// Accepts API-native entries (`Driver`, `Constructor`), bare driver records
/// (`givenName`/`familyName` at top level) and pre-flattened `name` entries.
pub fn name_parts(raw: &Value) -> Option<(String, String)> {
    let driver = raw.get("Driver").unwrap_or(raw);
    if let Some(family) = json_string(driver, "familyName") {
        let given = json_string(driver, "givenName").unwrap_or_default();
        return Some((given, family));
    }

    if let Some(name) = raw.get("Constructor").and_then(|c| json_string(c, "name")) {
        return Some((String::new(), name));
    }

    let name = json_string(raw, "name").or_else(|| json_string(raw, "driver"))?;
    let name = name.trim();
    match name.rsplit_once(char::is_whitespace) {
        Some((given, family)) => Some((given.trim().to_string(), family.to_string())),
        None => Some((String::new(), name.to_string())),
    }
}

/// Display name for an entry: "Given Family"
pub fn full_name(raw: &Value) -> Option<String> {
    let (given, family) = name_parts(raw)?;
    Some(format!("{} {}", given, family).trim().to_string())
}

fn team_name(raw: &Value) -> String {
    raw.get("Constructors")
        .and_then(|c| c.get(0))
        .and_then(|c| json_string(c, "name"))
        .or_else(|| raw.get("Constructor").and_then(|c| json_string(c, "name")))
        .or_else(|| json_string(raw, "team"))
        .or_else(|| json_string(raw, "constructor"))
        .unwrap_or_default()
}

/// Flatten one raw standings entry; `None` when it names nobody.
pub fn normalize_entry(raw: &Value) -> Option<StandingEntry> {
    let name = full_name(raw)?;
    if name.is_empty() {
        return None;
    }

    Some(StandingEntry {
        name,
        position: json_number_or(raw, "position", 0.0) as u32,
        points: json_number_or(raw, "points", 0.0),
        team: team_name(raw),
        wins: json_number_or(raw, "wins", 0.0) as u32,
    })
}

/// Extract and flatten standings in one step
pub fn normalize_standings(raw: &Value) -> Vec<StandingEntry> {
    extract_standings_array(raw)
        .iter()
        .filter_map(normalize_entry)
        .collect()
}

/// Case-insensitive match of a requested name against an entry.
///
/// Matches when the requested text is a substring of "given family", or when
/// it contains the family name ("Verstappen, Max" still matches).
pub fn matches_driver(raw: &Value, name: &str) -> bool {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }

    let Some((given, family)) = name_parts(raw) else {
        return false;
    };

    let family = family.to_lowercase();
    let full = format!("{} {}", given.to_lowercase(), family);

    full.contains(&needle) || (!family.is_empty() && needle.contains(&family))
}

/// Raw entries matching any of `names`, flattened, in standings order
pub fn filter_standings(entries: &[Value], names: &[String]) -> Vec<StandingEntry> {
    entries
        .iter()
        .filter(|entry| names.iter().any(|name| matches_driver(entry, name)))
        .filter_map(normalize_entry)
        .collect()
}
