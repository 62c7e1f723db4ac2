pub mod plurality;

pub use plurality::{percentages, summarize, total};

use serde::Serialize;
use std::collections::BTreeMap;

// Vote counts and shares for a single matchup
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteSummary {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub votes: BTreeMap<String, u64>,
    pub total: u64,
    pub percentages: BTreeMap<String, f64>,
    pub home_team_percent: f64,
    pub away_team_percent: f64,
    /// `None` while tied, including before any vote.
    pub leader: Option<String>,
}
