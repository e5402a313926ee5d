//! Driver Roster Cache
//!
//! Current-season driver names used by the query parser. The roster is loaded
//! lazily from the drivers endpoint and kept until its TTL expires or the
//! season rolls over. Concurrent callers that find it stale share a single
//! refresh: the refresh lock is taken, freshness is checked again, and only
//! the first caller hits the network.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::normalizer::{extract_drivers_array, full_name};
use super::parser::Roster;
use crate::client::SharedStats;
use crate::config::DriverCacheConfig;
use crate::constants::cache;

#[derive(Debug, Clone)]
struct Snapshot {
    season: i32,
    roster: Arc<Roster>,
    loaded_at: Instant,
    /// Built-in roster standing in for an unavailable endpoint
    fallback: bool,
}

pub struct DriverCache {
    stats: SharedStats,
    ttl: Duration,
    fallback_retry: Duration,
    snapshot: RwLock<Option<Snapshot>>,
    refresh_lock: Mutex<()>,
}

impl DriverCache {
    pub fn new(stats: SharedStats, ttl: Duration) -> Self {
        Self {
            stats,
            ttl,
            fallback_retry: Duration::from_secs(cache::ROSTER_FALLBACK_RETRY_SECS).min(ttl),
            snapshot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn from_config(stats: SharedStats, config: &DriverCacheConfig) -> Self {
        Self::new(stats, config.ttl())
    }

    pub fn current_season(&self) -> i32 {
        self.stats.current_season_year()
    }

    /// Roster for the current season, refreshing first when stale.
    pub async fn roster(&self) -> Arc<Roster> {
        if let Some(roster) = self.fresh().await {
            return roster;
        }

        let _guard = self.refresh_lock.lock().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(roster) = self.fresh().await {
            return roster;
        }
        self.load().await
    }

    /// Reload the roster regardless of expiry.
    pub async fn refresh(&self) -> Arc<Roster> {
        let _guard = self.refresh_lock.lock().await;
        self.load().await
    }

    /// Forget the loaded roster; the next read refreshes.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
    }

    async fn fresh(&self) -> Option<Arc<Roster>> {
        let snapshot = self.snapshot.read().await;
        let snapshot = snapshot.as_ref()?;

        let max_age = if snapshot.fallback {
            self.fallback_retry
        } else {
            self.ttl
        };

        (snapshot.season == self.stats.current_season_year()
            && snapshot.loaded_at.elapsed() < max_age)
            .then(|| Arc::clone(&snapshot.roster))
    }

    /// Fetch and store a new snapshot. Callers hold `refresh_lock`.
    async fn load(&self) -> Arc<Roster> {
        let season = self.stats.current_season_year();

        let fetched = match self.stats.drivers(Some(season)).await {
            Ok(body) => dedup_names(extract_drivers_array(&body).iter().filter_map(full_name)),
            Err(e) => {
                warn!(season, error = %e, "Driver roster fetch failed");
                Vec::new()
            }
        };

        let fallback = fetched.is_empty();
        let names = if fallback {
            info!(season, "Using built-in driver roster");
            builtin_roster()
        } else {
            debug!(season, count = fetched.len(), "Driver roster refreshed");
            fetched
        };

        let roster = Arc::new(Roster::new(names));
        *self.snapshot.write().await = Some(Snapshot {
            season,
            roster: Arc::clone(&roster),
            loaded_at: Instant::now(),
            fallback,
        });
        roster
    }
}

fn builtin_roster() -> Vec<String> {
    cache::FALLBACK_DRIVER_ROSTER
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn dedup_names(names: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockStats;
    use serde_json::json;

    fn roster() -> serde_json::Value {
        json!({"MRData": {"DriverTable": {"Drivers": [
            {"givenName": "Max", "familyName": "Verstappen"},
            {"givenName": "Lando", "familyName": "Norris"},
            {"givenName": "Max", "familyName": "Verstappen"}
        ]}}})
    }

    #[tokio::test]
    async fn test_lazy_load_then_cached() {
        let stats = Arc::new(MockStats::new(2024).with_drivers(roster()));
        let cache = DriverCache::new(stats.clone(), Duration::from_secs(3600));

        let roster = cache.roster().await;
        assert_eq!(roster.names().collect::<Vec<_>>(), vec!["Max Verstappen", "Lando Norris"]);
        cache.roster().await;
        assert_eq!(stats.calls(), vec!["drivers:2024"]);
    }

    #[tokio::test]
    async fn test_explicit_refresh_and_invalidate() {
        let stats = Arc::new(MockStats::new(2024).with_drivers(roster()));
        let cache = DriverCache::new(stats.clone(), Duration::from_secs(3600));

        cache.roster().await;
        cache.refresh().await;
        cache.invalidate().await;
        cache.roster().await;
        assert_eq!(stats.count("drivers"), 3);
    }

    #[tokio::test]
    async fn test_expired_roster_reloaded() {
        let stats = Arc::new(MockStats::new(2024).with_drivers(roster()));
        let cache = DriverCache::new(stats.clone(), Duration::ZERO);
        cache.roster().await;
        cache.roster().await;
        assert_eq!(stats.count("drivers"), 2);
    }

    #[tokio::test]
    async fn test_concurrent_readers_share_one_refresh() {
        let stats = Arc::new(
            MockStats::new(2024)
                .with_drivers(roster())
                .with_delay(Duration::from_millis(30)),
        );
        let cache = Arc::new(DriverCache::new(stats.clone(), Duration::from_secs(3600)));

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.roster().await.len() })
            })
            .collect();

        for reader in readers {
            assert_eq!(reader.await.unwrap(), 2);
        }
        assert_eq!(stats.count("drivers"), 1);
    }

    #[tokio::test]
    async fn test_unavailable_endpoint_uses_builtin_roster() {
        let stats = Arc::new(MockStats::new(2025));
        let cache = DriverCache::new(stats.clone(), Duration::from_secs(3600));

        let roster = cache.roster().await;
        assert!(roster.contains("Lewis Hamilton"));
        assert_eq!(roster.len(), cache::FALLBACK_DRIVER_ROSTER.len());

        // Served from the snapshot until the shorter fallback window passes
        cache.roster().await;
        assert_eq!(stats.count("drivers"), 1);
    }

    #[tokio::test]
    async fn test_empty_roster_uses_builtin() {
        let stats = Arc::new(MockStats::new(2025).with_drivers(json!({"drivers": []})));
        let cache = DriverCache::new(stats, Duration::from_secs(3600));
        assert!(!cache.roster().await.is_empty());
    }
}
