//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/paddock/) and project (.paddock/) level configuration.

use std::time::Duration;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{cache, network, season};
use crate::types::{PaddockError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Remote endpoints and call budgets
    pub api: ApiConfig,

    /// Season resolution
    pub season: SeasonConfig,

    /// Driver roster cache settings
    pub drivers: DriverCacheConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            api: ApiConfig::default(),
            season: SeasonConfig::default(),
            drivers: DriverCacheConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `PaddockError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("api.stats_base_url", &self.api.stats_base_url)?;
        validate_base_url("api.agent_base_url", &self.api.agent_base_url)?;

        if self.api.timeout_secs == 0 {
            return Err(PaddockError::Config(
                "api.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.api.agent_timeout_secs == 0 {
            return Err(PaddockError::Config(
                "api.agent_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if let Some(year) = self.season.current {
            let latest = wall_clock_year() + 1;
            if !(season::FIRST_SEASON..=latest).contains(&year) {
                return Err(PaddockError::Config(format!(
                    "season.current must be between {} and {}, got {}",
                    season::FIRST_SEASON,
                    latest,
                    year
                )));
            }
        }

        if !(1..=cache::DRIVER_CACHE_MAX_TTL_HOURS).contains(&self.drivers.ttl_hours) {
            return Err(PaddockError::Config(format!(
                "drivers.ttl_hours must be between 1 and {}, got {}",
                cache::DRIVER_CACHE_MAX_TTL_HOURS,
                self.drivers.ttl_hours
            )));
        }

        Ok(())
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .map_err(|e| PaddockError::Config(format!("Invalid {} '{}': {}", field, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PaddockError::Config(format!(
            "{} must use http or https scheme, got: {}",
            field,
            url.scheme()
        )));
    }

    Ok(())
}

// =============================================================================
// API Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Statistics API base URL (seasons, races, standings, ...)
    pub stats_base_url: String,

    /// Analysis service base URL (agents)
    pub agent_base_url: String,

    /// Per-attempt timeout for direct statistics calls
    pub timeout_secs: u64,

    /// Per-attempt timeout for analysis calls
    pub agent_timeout_secs: u64,

    /// Delay before the single network retry
    pub retry_delay_ms: u64,

    /// Lifetime of cached statistics responses; 0 disables caching
    pub cache_ttl_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            stats_base_url: network::DEFAULT_STATS_BASE_URL.to_string(),
            agent_base_url: network::DEFAULT_AGENT_BASE_URL.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            agent_timeout_secs: network::AGENT_TIMEOUT_SECS,
            retry_delay_ms: network::RETRY_DELAY_MS,
            cache_ttl_secs: cache::RESPONSE_CACHE_TTL_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

// =============================================================================
// Season Configuration
// =============================================================================

/// Resolves what "the current season" means.
///
/// A pinned `current` wins; otherwise the UTC calendar year is used so the
/// default never goes stale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonConfig {
    pub current: Option<i32>,
}

impl SeasonConfig {
    pub fn pinned(year: i32) -> Self {
        Self {
            current: Some(year),
        }
    }

    pub fn current_season(&self) -> i32 {
        self.current.unwrap_or_else(wall_clock_year)
    }
}

fn wall_clock_year() -> i32 {
    Utc::now().year()
}

// =============================================================================
// Driver Cache Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverCacheConfig {
    /// Roster expiry in hours
    pub ttl_hours: u64,
}

impl Default for DriverCacheConfig {
    fn default() -> Self {
        Self {
            ttl_hours: cache::DRIVER_CACHE_TTL_HOURS,
        }
    }
}

impl DriverCacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_hours.saturating_mul(3600))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.api.retry_delay_ms, 1000);
        assert_eq!(config.drivers.ttl_hours, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_agent_timeout_longer_than_direct() {
        let api = ApiConfig::default();
        assert!(api.agent_timeout() > api.timeout());
    }

    #[test]
    fn test_season_resolution() {
        assert_eq!(SeasonConfig::pinned(2021).current_season(), 2021);
        assert_eq!(SeasonConfig::default().current_season(), Utc::now().year());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.api.stats_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.agent_base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.season.current = Some(1900);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.drivers.ttl_hours = u64::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let drivers = DriverCacheConfig { ttl_hours: u64::MAX };
        assert_eq!(drivers.ttl(), Duration::from_secs(u64::MAX));
    }
}
