//! Direct Data Gateway
//!
//! Typed access to the statistics API, one method per resource. Each method
//! builds a deterministic path against the configured base URL and returns the
//! raw JSON body; shape normalization is the caller's concern.
//!
//! Errors propagate unmodified. The only built-in substitution is
//! [`StatsApi::next_race`], which serves the season's last race when no future
//! race remains.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::{debug, instrument};

use super::cache::ResponseCache;
use super::normalize_base_url;
use super::transport::{HttpRequest, SharedTransport, Transport};
use crate::config::{Config, SeasonConfig};
use crate::query::normalizer::extract_races_array;
use crate::types::{PaddockError, Result, json_string};

/// Statistics resources available to the router and to direct callers.
///
/// `year: None` means the current season.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// The season `None` resolves to
    fn current_season_year(&self) -> i32;

    async fn seasons(&self) -> Result<Value>;

    async fn season(&self, year: Option<i32>) -> Result<Value>;

    async fn races(&self, year: Option<i32>) -> Result<Value>;

    async fn drivers(&self, year: Option<i32>) -> Result<Value>;

    async fn constructors(&self, year: Option<i32>) -> Result<Value>;

    async fn driver_standings(&self, year: Option<i32>) -> Result<Value>;

    async fn constructor_standings(&self, year: Option<i32>) -> Result<Value>;

    async fn race_results(&self, year: Option<i32>, round: u32) -> Result<Value>;

    async fn qualifying_results(&self, year: Option<i32>, round: u32) -> Result<Value>;

    async fn current_season(&self) -> Result<Value> {
        self.season(None).await
    }

    /// First race on or after today; the season's last race when none remain.
    async fn next_race(&self) -> Result<Value> {
        let races = extract_races_array(&self.races(None).await?);
        select_next_race(&races, today()).ok_or_else(|| {
            PaddockError::parse("stats API", "race calendar is empty")
        })
    }

    /// Latest race on or before today; the season opener before it starts.
    async fn current_race(&self) -> Result<Value> {
        let races = extract_races_array(&self.races(None).await?);
        select_current_race(&races, today()).ok_or_else(|| {
            PaddockError::parse("stats API", "race calendar is empty")
        })
    }
}

pub type SharedStats = Arc<dyn StatsApi>;

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn race_date(race: &Value) -> Option<NaiveDate> {
    let date = json_string(race, "date")?;
    NaiveDate::parse_from_str(&date, "%Y-%m-%d").ok()
}

/// First race dated on or after `today`, else the last race in the list
pub fn select_next_race(races: &[Value], today: NaiveDate) -> Option<Value> {
    races
        .iter()
        .find(|race| race_date(race).is_some_and(|date| date >= today))
        .or_else(|| races.last())
        .cloned()
}

/// Last race dated on or before `today`, else the first race in the list
pub fn select_current_race(races: &[Value], today: NaiveDate) -> Option<Value> {
    races
        .iter()
        .rev()
        .find(|race| race_date(race).is_some_and(|date| date <= today))
        .or_else(|| races.first())
        .cloned()
}

// =============================================================================
// HTTP implementation
// =============================================================================

/// Statistics API client with a short-lived response cache
pub struct StatsClient {
    base_url: String,
    transport: Transport,
    timeout: Duration,
    season: SeasonConfig,
    cache: ResponseCache,
}

impl StatsClient {
    pub fn new(
        base_url: &str,
        transport: Transport,
        timeout: Duration,
        season: SeasonConfig,
        cache_ttl: Duration,
    ) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            transport,
            timeout,
            season,
            cache: ResponseCache::new(cache_ttl),
        })
    }

    pub fn from_config(config: &Config, http: SharedTransport) -> Result<Self> {
        let transport = Transport::new(http).with_retry_delay(config.api.retry_delay());
        Self::new(
            &config.api.stats_base_url,
            transport,
            config.api.timeout(),
            config.season,
            config.api.cache_ttl(),
        )
    }

    fn year(&self, year: Option<i32>) -> i32 {
        year.unwrap_or_else(|| self.season.current_season())
    }

    #[instrument(skip(self), fields(base = %self.base_url))]
    async fn get(&self, path: &str) -> Result<Value> {
        if let Some(body) = self.cache.get(path) {
            return Ok(body);
        }

        let url = format!("{}{}", self.base_url, path);
        let body = self
            .transport
            .request(HttpRequest::get(url.clone(), self.timeout))
            .await?;
        if body.is_null() {
            return Err(PaddockError::parse(url, "empty response body"));
        }

        debug!(path, "statistics response received");
        self.cache.insert(path, body.clone());
        Ok(body)
    }
}

#[async_trait]
impl StatsApi for StatsClient {
    fn current_season_year(&self) -> i32 {
        self.season.current_season()
    }

    async fn seasons(&self) -> Result<Value> {
        self.get("/seasons").await
    }

    async fn season(&self, year: Option<i32>) -> Result<Value> {
        self.get(&format!("/seasons/{}", self.year(year))).await
    }

    async fn races(&self, year: Option<i32>) -> Result<Value> {
        self.get(&format!("/races/{}", self.year(year))).await
    }

    async fn drivers(&self, year: Option<i32>) -> Result<Value> {
        self.get(&format!("/drivers/{}", self.year(year))).await
    }

    async fn constructors(&self, year: Option<i32>) -> Result<Value> {
        self.get(&format!("/constructors/{}", self.year(year))).await
    }

    async fn driver_standings(&self, year: Option<i32>) -> Result<Value> {
        self.get(&format!("/standings/{}", self.year(year))).await
    }

    async fn constructor_standings(&self, year: Option<i32>) -> Result<Value> {
        self.get(&format!("/standings/{}/constructors", self.year(year)))
            .await
    }

    async fn race_results(&self, year: Option<i32>, round: u32) -> Result<Value> {
        self.get(&format!("/results/{}/{}", self.year(year), round))
            .await
    }

    async fn qualifying_results(&self, year: Option<i32>, round: u32) -> Result<Value> {
        self.get(&format!("/qualifying/{}/{}", self.year(year), round))
            .await
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Canned statistics API. Unset resources fail with a network error.
    pub(crate) struct MockStats {
        year: i32,
        season: Option<Value>,
        races: Option<Value>,
        drivers: Option<Value>,
        standings: Option<Value>,
        failing_years: Vec<i32>,
        delay: Duration,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl MockStats {
        pub(crate) fn new(year: i32) -> Self {
            Self {
                year,
                season: None,
                races: None,
                drivers: None,
                standings: None,
                failing_years: Vec::new(),
                delay: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_season(mut self, body: Value) -> Self {
            self.season = Some(body);
            self
        }

        pub(crate) fn with_races(mut self, body: Value) -> Self {
            self.races = Some(body);
            self
        }

        pub(crate) fn with_drivers(mut self, body: Value) -> Self {
            self.drivers = Some(body);
            self
        }

        pub(crate) fn with_standings(mut self, body: Value) -> Self {
            self.standings = Some(body);
            self
        }

        /// Standings for these seasons fail even when standings are set
        pub(crate) fn failing_standings_for(mut self, years: &[i32]) -> Self {
            self.failing_years = years.to_vec();
            self
        }

        pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub(crate) fn count(&self, prefix: &str) -> usize {
            self.calls()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        async fn respond(&self, call: String, body: &Option<Value>) -> Result<Value> {
            self.calls.lock().unwrap().push(call.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            body.clone()
                .ok_or_else(|| PaddockError::network(call, "statistics API unavailable"))
        }

        fn resolve(&self, year: Option<i32>) -> i32 {
            year.unwrap_or(self.year)
        }
    }

    #[async_trait]
    impl StatsApi for MockStats {
        fn current_season_year(&self) -> i32 {
            self.year
        }

        async fn seasons(&self) -> Result<Value> {
            self.respond("seasons".into(), &self.season).await
        }

        async fn season(&self, year: Option<i32>) -> Result<Value> {
            let call = format!("season:{}", self.resolve(year));
            self.respond(call, &self.season).await
        }

        async fn races(&self, year: Option<i32>) -> Result<Value> {
            let call = format!("races:{}", self.resolve(year));
            self.respond(call, &self.races).await
        }

        async fn drivers(&self, year: Option<i32>) -> Result<Value> {
            let call = format!("drivers:{}", self.resolve(year));
            self.respond(call, &self.drivers).await
        }

        async fn constructors(&self, year: Option<i32>) -> Result<Value> {
            let call = format!("constructors:{}", self.resolve(year));
            self.respond(call, &None).await
        }

        async fn driver_standings(&self, year: Option<i32>) -> Result<Value> {
            let year = self.resolve(year);
            let body = if self.failing_years.contains(&year) {
                None
            } else {
                self.standings.clone()
            };
            self.respond(format!("standings:{}", year), &body).await
        }

        async fn constructor_standings(&self, year: Option<i32>) -> Result<Value> {
            let call = format!("constructor_standings:{}", self.resolve(year));
            self.respond(call, &self.standings).await
        }

        async fn race_results(&self, year: Option<i32>, round: u32) -> Result<Value> {
            let call = format!("results:{}/{}", self.resolve(year), round);
            self.respond(call, &None).await
        }

        async fn qualifying_results(&self, year: Option<i32>, round: u32) -> Result<Value> {
            let call = format!("qualifying:{}/{}", self.resolve(year), round);
            self.respond(call, &None).await
        }
    }
}
