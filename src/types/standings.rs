use serde::{Deserialize, Serialize};

/// One driver's (or constructor's) standing in a season, flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub name: String,
    pub position: u32,
    pub points: f64,
    pub team: String,
    pub wins: u32,
}
