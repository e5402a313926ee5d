//! Config Command
//!
//! Manage Paddock configuration.
//!
//! Usage:
//!   paddock config show [-g] [-f json]
//!   paddock config path
//!   paddock config init [-g] [--force]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show configuration
pub fn show(global: bool, out: &Output) -> Result<()> {
    if !global {
        // Merged effective config
        return ConfigLoader::show_config(out.is_json());
    }

    match ConfigLoader::global_config_path() {
        Some(path) if path.exists() => {
            let content = std::fs::read_to_string(&path)?;
            println!("# Global Config: {}\n", path.display());
            println!("{}", content);
        }
        Some(_) => {
            out.info("No global config found.");
            println!("Run 'paddock config init --global' to create one.");
        }
        None => out.warning("Cannot determine global config directory."),
    }
    Ok(())
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool, out: &Output) -> Result<()> {
    let path = ConfigLoader::init(global, force)?;
    let scope = if global { "global" } else { "project" };
    out.success(&format!("Initialized {} configuration", scope));
    println!("  Config: {}", path.display());
    Ok(())
}
