use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::teams::normalize_team_name;

/// One team's line in a single completed game, as the provider's game log
/// reports it. Every game appears twice, once per team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameLogRow {
    #[serde(rename = "GAME_ID")]
    pub game_id: String,
    #[serde(rename = "GAME_DATE")]
    pub game_date: NaiveDate,
    #[serde(rename = "TEAM_ID")]
    pub team_id: u32,
    #[serde(rename = "TEAM_NAME")]
    pub team_name: String,
    /// "BOS vs. MIA" for a home game, "BOS @ MIA" for a road game.
    #[serde(rename = "MATCHUP")]
    pub matchup: String,
    #[serde(rename = "WL")]
    pub wl: String,
    #[serde(rename = "PLUS_MINUS")]
    pub plus_minus: f64,
    #[serde(rename = "TOV")]
    pub turnovers: f64,
    #[serde(rename = "FGA")]
    pub field_goal_attempts: f64,
    #[serde(rename = "FTA")]
    pub free_throw_attempts: f64,
    #[serde(rename = "REB")]
    pub rebounds: f64,
    #[serde(rename = "AST")]
    pub assists: f64,
}

impl GameLogRow {
    pub fn is_win(&self) -> bool {
        self.wl.trim().eq_ignore_ascii_case("W")
    }

    /// Resolves the row into a home/away game with its actual winner.
    pub fn to_historical(&self) -> Option<HistoricalGame> {
        let team = normalize_team_name(&self.team_name);
        let (is_home, opponent) = if let Some((_, opponent)) = self.matchup.split_once("vs.") {
            (true, opponent)
        } else if let Some((_, opponent)) = self.matchup.split_once('@') {
            (false, opponent)
        } else {
            return None;
        };

        let opponent = normalize_team_name(opponent);
        if opponent.is_empty() {
            return None;
        }
        let actual_winner = if self.is_win() { team.clone() } else { opponent.clone() };
        let (home_team, away_team) = if is_home { (team, opponent) } else { (opponent, team) };

        Some(HistoricalGame {
            game_id: self.game_id.clone(),
            game_date: self.game_date,
            home_team,
            away_team,
            actual_winner,
        })
    }
}

/// A completed game with canonical team names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoricalGame {
    pub game_id: String,
    pub game_date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub actual_winner: String,
}

/// Collapses a game log into one entry per game. Rows with unreadable
/// matchups are dropped first; of the rest, the first row for a game id wins.
pub fn historical_games(log: &[GameLogRow]) -> Vec<HistoricalGame> {
    let mut seen = HashSet::new();
    log.iter()
        .filter_map(GameLogRow::to_historical)
        .filter(|game| seen.insert(game.game_id.clone()))
        .collect()
}

/// Season label ("2025-26") containing `date`. Seasons roll over in October.
pub fn season_for(date: NaiveDate) -> String {
    let year = date.year();
    let start = if date.month() >= 10 { year } else { year - 1 };
    format!("{}-{:02}", start, (start + 1).rem_euclid(100))
}
