//! Query Parser
//!
//! Turns a free-text question into [`QueryHints`] for the fallback router:
//! the first plausible season year, the drivers it names, and keyword intents.
//! Parsing is deterministic for a given roster snapshot.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::debug;

use super::driver_cache::DriverCache;
use crate::constants::season;
use crate::types::QueryHints;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

const COMPARISON_KEYWORDS: &[&str] = &["compare", "vs"];
const CAREER_KEYWORDS: &[&str] = &["career", "statistics", "stats"];
const RACE_KEYWORDS: &[&str] = &["race", "next", "current"];
const SEASON_KEYWORDS: &[&str] = &["season", "championship", "standings"];

pub struct QueryParser {
    drivers: Arc<DriverCache>,
}

impl QueryParser {
    pub fn new(drivers: Arc<DriverCache>) -> Self {
        Self { drivers }
    }

    /// Parse against the current roster, refreshing it first if stale.
    pub async fn parse(&self, query: &str) -> QueryHints {
        let roster = self.drivers.roster().await;
        let hints = parse_with_roster(query, &roster, self.drivers.current_season());
        debug!(?hints, "parsed query");
        hints
    }
}

#[derive(Debug)]
struct RosterEntry {
    name: String,
    full: Regex,
    /// Family name alone; only set when no other entry shares it
    family: Option<Regex>,
}

impl RosterEntry {
    fn first_mention(&self, query: &str) -> Option<usize> {
        let full = self.full.find(query).map(|m| m.start());
        let family = self
            .family
            .as_ref()
            .and_then(|re| re.find(query))
            .map(|m| m.start());
        full.into_iter().chain(family).min()
    }
}

/// Driver names with their matchers compiled once per roster snapshot.
#[derive(Debug)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    pub fn new(names: Vec<String>) -> Self {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let families: Vec<String> = names.iter().map(|name| family_name(name).to_lowercase()).collect();

        let entries = names
            .iter()
            .zip(&families)
            .filter_map(|(name, family)| {
                let full = word_pattern(name)?;
                let shared = families.iter().filter(|f| *f == family).count() > 1;
                let family = if shared || family.eq_ignore_ascii_case(name) {
                    None
                } else {
                    word_pattern(family_name(name))
                };
                Some(RosterEntry {
                    name: name.clone(),
                    full,
                    family,
                })
            })
            .collect();

        Self { entries }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

fn family_name(name: &str) -> &str {
    name.rsplit(char::is_whitespace).next().unwrap_or(name)
}

fn word_pattern(text: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(text))).ok()
}

/// Pure parsing step over a fixed roster.
pub fn parse_with_roster(query: &str, roster: &Roster, current_season: i32) -> QueryHints {
    let lowered = query.to_lowercase();

    QueryHints {
        year: extract_year(query, current_season),
        drivers: extract_drivers(query, roster),
        is_comparison: contains_any(&lowered, COMPARISON_KEYWORDS),
        is_career_stats: contains_any(&lowered, CAREER_KEYWORDS),
        is_race_query: contains_any(&lowered, RACE_KEYWORDS),
        is_season_query: contains_any(&lowered, SEASON_KEYWORDS),
    }
}

/// First 19xx/20xx token that is a championship season up to `current_season`
pub fn extract_year(query: &str, current_season: i32) -> Option<i32> {
    YEAR_PATTERN
        .find_iter(query)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .find(|year| (season::FIRST_SEASON..=current_season).contains(year))
}

/// Roster names mentioned in the query, ordered by first mention.
///
/// A bare family name counts only when it identifies a single roster entry.
pub fn extract_drivers(query: &str, roster: &Roster) -> Vec<String> {
    let mut found: Vec<(usize, &str)> = roster
        .entries
        .iter()
        .filter_map(|entry| entry.first_mention(query).map(|pos| (pos, entry.name.as_str())))
        .collect();
    found.sort_by_key(|(pos, _)| *pos);

    let mut drivers: Vec<String> = Vec::with_capacity(found.len());
    for (_, name) in found {
        if !drivers.iter().any(|d| d == name) {
            drivers.push(name.to_string());
        }
    }
    drivers
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| haystack.contains(k))
}
