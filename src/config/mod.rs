//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/paddock/config.toml)
//! 3. Project config (.paddock/config.toml)
//! 4. Environment variables (PADDOCK_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
