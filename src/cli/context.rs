//! CLI Command Context
//!
//! Shared wiring for commands: configuration, transport and the two gateways.

use std::sync::Arc;

use crate::client::{
    AgentClient, ReqwestTransport, SharedAgent, SharedStats, SharedTransport, StatsClient,
};
use crate::config::{Config, ConfigLoader};
use crate::query::DriverCache;
use crate::router::SmartRouter;
use crate::types::Result;

#[derive(Clone)]
pub struct CommandContext {
    pub config: Config,
    pub stats: SharedStats,
    pub agent: SharedAgent,
}

impl CommandContext {
    /// Load merged configuration and build clients
    pub fn load() -> Result<Self> {
        Self::from_config(ConfigLoader::load()?)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let http: SharedTransport = Arc::new(ReqwestTransport::new()?);
        let stats: SharedStats = Arc::new(StatsClient::from_config(&config, Arc::clone(&http))?);
        let agent: SharedAgent = Arc::new(AgentClient::from_config(&config, http)?);

        Ok(Self {
            config,
            stats,
            agent,
        })
    }

    pub fn router(&self) -> SmartRouter {
        let drivers = Arc::new(DriverCache::from_config(
            Arc::clone(&self.stats),
            &self.config.drivers,
        ));
        SmartRouter::new(Arc::clone(&self.agent), Arc::clone(&self.stats), drivers)
    }
}
