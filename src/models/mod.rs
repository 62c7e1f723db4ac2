use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of fields every normalized schedule row is coerced into.
pub const GAME_FIELDS: usize = 6;

/// One scraped schedule row, normalized to a fixed width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub date: String,
    pub time: String,
    pub away_team: String,
    pub home_team: String,
    pub venue: String,
    pub result: String,
    pub parsed_date: Option<NaiveDate>,
}

impl Game {
    pub fn from_record(record: [String; GAME_FIELDS], default_year: i32) -> Self {
        let [date, time, away_team, home_team, venue, result] = record;
        let id = crate::scrape::matchup_id(&date, &time, &away_team, &home_team);
        let parsed_date = crate::scrape::parse_game_date(&date, default_year);

        Self {
            id,
            date,
            time,
            away_team,
            home_team,
            venue,
            result,
            parsed_date,
        }
    }

    pub fn matchup(&self) -> Matchup {
        Matchup {
            id: self.id.clone(),
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
        }
    }

    pub fn dom_id(&self) -> String {
        crate::scrape::dom_id(&self.id)
    }
}

/// A pair of teams that can be voted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
}

impl Matchup {
    pub fn new(id: impl Into<String>, home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
        }
    }

    pub fn has_team(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// Current vote counts for one matchup, keyed by team name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub matchup: Matchup,
    pub counts: BTreeMap<String, u64>,
}

impl Tally {
    pub fn empty(matchup: Matchup) -> Self {
        let mut counts = BTreeMap::new();
        counts.insert(matchup.home_team.clone(), 0);
        counts.insert(matchup.away_team.clone(), 0);
        Self { matchup, counts }
    }

    pub fn count_for(&self, team: &str) -> u64 {
        self.counts.get(team).copied().unwrap_or(0)
    }
}

/// Body of `POST /vote`. Fields are optional so missing ones can be reported as 400.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoteRequest {
    pub game_id: Option<String>,
    pub team_id: Option<String>,
    #[serde(default, alias = "homeId")]
    pub home_team: Option<String>,
    #[serde(default, alias = "awayId")]
    pub away_team: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoteResponse {
    pub success: bool,
    pub game_id: String,
    pub votes: BTreeMap<String, u64>,
    pub total: u64,
    pub percentages: BTreeMap<String, f64>,
    pub home_team_percent: f64,
    pub away_team_percent: f64,
}

/// A windowed game with its current vote summary, as served by `/api/games`.
#[derive(Debug, Clone, Serialize)]
pub struct GameWithVotes {
    #[serde(flatten)]
    pub game: Game,
    pub dom_id: String,
    pub votes: crate::voting::VoteSummary,
}
