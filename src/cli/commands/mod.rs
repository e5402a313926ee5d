pub mod config;
pub mod dashboard;
pub mod query;
pub mod stats;
