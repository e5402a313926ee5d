//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// HTTP/Network constants
pub mod network {
    /// Default timeout for direct statistics calls (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Timeout for analysis service calls (seconds); the service may reason in several steps
    pub const AGENT_TIMEOUT_SECS: u64 = 45;

    /// Attempts after the first one for network-class failures
    pub const MAX_NETWORK_RETRIES: usize = 1;

    /// Fixed delay before the retry (milliseconds)
    pub const RETRY_DELAY_MS: u64 = 1000;

    /// Default statistics API base URL
    pub const DEFAULT_STATS_BASE_URL: &str = "http://localhost:8000/api/f1";

    /// Default analysis service base URL
    pub const DEFAULT_AGENT_BASE_URL: &str = "http://localhost:8000/api";
}

/// Cache constants
pub mod cache {
    /// Driver roster expiry (hours)
    pub const DRIVER_CACHE_TTL_HOURS: u64 = 24;

    /// Longest accepted roster expiry (one year)
    pub const DRIVER_CACHE_MAX_TTL_HOURS: u64 = 24 * 365;

    /// Direct-data response cache lifetime (seconds)
    pub const RESPONSE_CACHE_TTL_SECS: u64 = 300;

    /// How long a built-in roster stands in before the drivers endpoint is retried (seconds)
    pub const ROSTER_FALLBACK_RETRY_SECS: u64 = 300;

    /// Grid used when the drivers endpoint is unreachable or empty
    pub const FALLBACK_DRIVER_ROSTER: &[&str] = &[
        "Max Verstappen",
        "Yuki Tsunoda",
        "Lando Norris",
        "Oscar Piastri",
        "Charles Leclerc",
        "Lewis Hamilton",
        "George Russell",
        "Andrea Kimi Antonelli",
        "Fernando Alonso",
        "Lance Stroll",
        "Pierre Gasly",
        "Franco Colapinto",
        "Esteban Ocon",
        "Oliver Bearman",
        "Alexander Albon",
        "Carlos Sainz",
        "Nico Hulkenberg",
        "Gabriel Bortoleto",
        "Liam Lawson",
        "Isack Hadjar",
    ];
}

/// Season constants
pub mod season {
    /// First Formula 1 world championship season
    pub const FIRST_SEASON: i32 = 1950;

    /// Number of seasons covered by the career-stats handler (current + prior)
    pub const CAREER_SEASONS: i32 = 3;
}
