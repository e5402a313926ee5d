//! Paddock - Formula 1 Statistics Client
//!
//! Answers free-text Formula 1 questions by asking a remote multi-agent
//! analysis service first and, when that fails, routing the question to the
//! statistics API directly.
//!
//! ## Core Features
//!
//! - **Smart Router**: agent-first answering with one direct-data fallback per query
//! - **Query Parser**: season, driver and intent hints from free text
//! - **Response Normalizer**: flat standings from every known API envelope
//! - **Resilient Transport**: per-call timeout with a single network retry
//!
//! ## Quick Start
//!
//! ```ignore
//! use paddock::{CommandContext, QueryOptions};
//!
//! let ctx = CommandContext::load()?;
//! let router = ctx.router();
//! let result = router
//!     .smart_query("Compare Max Verstappen and Lewis Hamilton", &QueryOptions::default())
//!     .await;
//! println!("{} -> {}", result.mode(), result.is_success());
//! ```
//!
//! ## Modules
//!
//! - [`client`]: HTTP transport, statistics and agent gateways
//! - [`query`]: driver roster cache, query parser, response normalizer
//! - [`router`]: classification and fallback handlers
//! - [`config`]: layered configuration
//! - [`dashboard`]: concurrent overview snapshot

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod query;
pub mod router;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{ApiConfig, Config, ConfigLoader, DriverCacheConfig, SeasonConfig};

// Error Types
pub use types::error::{ErrorKind, PaddockError, Result};

// Query and result envelopes
pub use types::{
    AgentResult, FallbackHandler, QueryHints, QueryOptions, QueryResult, RouteMode, StandingEntry,
};

// =============================================================================
// Client Re-exports
// =============================================================================

pub use client::{
    AgentApi, AgentClient, HttpTransport, ReqwestTransport, SharedAgent, SharedStats,
    SharedTransport, StatsApi, StatsClient, Transport,
};

// =============================================================================
// Routing Re-exports
// =============================================================================

pub use cli::CommandContext;
pub use dashboard::Dashboard;
pub use query::{DriverCache, QueryParser, extract_standings_array, matches_driver};
pub use router::{SmartRouter, classify};
