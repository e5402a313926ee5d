//! Query understanding: roster cache, parser and response normalization.

pub mod driver_cache;
pub mod normalizer;
pub mod parser;

pub use driver_cache::DriverCache;
pub use normalizer::{
    extract_drivers_array, extract_races_array, extract_standings_array, filter_standings,
    matches_driver, normalize_entry, normalize_standings,
};
pub use parser::{QueryParser, Roster, parse_with_roster};
