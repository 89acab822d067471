use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Number of model features per team.
pub const FEATURE_COUNT: usize = 14;

/// A model feature. [`FeatureName::ALL`] is the one ordered feature list shared
/// by training and inference; nothing else in the workspace spells it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureName {
    WPct,
    NetRating,
    TurnoverPct,
    PlusMinus,
    Tov,
    Fga,
    Fta,
    Reb,
    Ast,
    #[serde(rename = "W_PCT_LAST5")]
    WPctLast5,
    #[serde(rename = "NET_RATING_LAST5")]
    NetRatingLast5,
    #[serde(rename = "TURNOVER_PCT_LAST5")]
    TurnoverPctLast5,
    #[serde(rename = "REB_LAST5")]
    RebLast5,
    #[serde(rename = "AST_LAST5")]
    AstLast5,
}

impl FeatureName {
    /// Canonical feature order. Changing it invalidates every trained artifact.
    pub const ALL: [FeatureName; FEATURE_COUNT] = [
        FeatureName::WPct,
        FeatureName::NetRating,
        FeatureName::TurnoverPct,
        FeatureName::PlusMinus,
        FeatureName::Tov,
        FeatureName::Fga,
        FeatureName::Fta,
        FeatureName::Reb,
        FeatureName::Ast,
        FeatureName::WPctLast5,
        FeatureName::NetRatingLast5,
        FeatureName::TurnoverPctLast5,
        FeatureName::RebLast5,
        FeatureName::AstLast5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureName::WPct => "W_PCT",
            FeatureName::NetRating => "NET_RATING",
            FeatureName::TurnoverPct => "TURNOVER_PCT",
            FeatureName::PlusMinus => "PLUS_MINUS",
            FeatureName::Tov => "TOV",
            FeatureName::Fga => "FGA",
            FeatureName::Fta => "FTA",
            FeatureName::Reb => "REB",
            FeatureName::Ast => "AST",
            FeatureName::WPctLast5 => "W_PCT_LAST5",
            FeatureName::NetRatingLast5 => "NET_RATING_LAST5",
            FeatureName::TurnoverPctLast5 => "TURNOVER_PCT_LAST5",
            FeatureName::RebLast5 => "REB_LAST5",
            FeatureName::AstLast5 => "AST_LAST5",
        }
    }

    /// True for the recent-form features derived from the last five games.
    pub fn is_last5(&self) -> bool {
        matches!(
            self,
            FeatureName::WPctLast5
                | FeatureName::NetRatingLast5
                | FeatureName::TurnoverPctLast5
                | FeatureName::RebLast5
                | FeatureName::AstLast5
        )
    }
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One team's season aggregates as delivered by the stats provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawTeamStatRow {
    #[serde(rename = "TEAM_ID")]
    pub team_id: u32,
    #[serde(rename = "TEAM_NAME")]
    pub team_name: String,
    #[serde(rename = "GP")]
    pub games_played: u32,
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "L")]
    pub losses: u32,
    #[serde(rename = "W_PCT")]
    pub win_pct: f64,
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

/// Recent-form metrics over a team's five most recent games. Any field may be
/// absent when the provider could not supply it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Last5Aggregate {
    pub win_pct: Option<f64>,
    pub net_rating: Option<f64>,
    pub turnover_pct: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
}

impl Last5Aggregate {
    pub fn is_complete(&self) -> bool {
        self.win_pct.is_some()
            && self.net_rating.is_some()
            && self.turnover_pct.is_some()
            && self.rebounds.is_some()
            && self.assists.is_some()
    }
}

/// Derived statistical profile of one team, keyed by canonical team name.
///
/// Fields are optional: a record missing any feature is *incomplete*, which is
/// an expected condition that consumers check for rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CanonicalFeatureRecord {
    pub team_name: String,
    pub win_pct: Option<f64>,
    pub net_rating: Option<f64>,
    pub turnover_pct: Option<f64>,
    pub plus_minus: Option<f64>,
    pub turnovers: Option<f64>,
    pub field_goal_attempts: Option<f64>,
    pub free_throw_attempts: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub win_pct_last5: Option<f64>,
    pub net_rating_last5: Option<f64>,
    pub turnover_pct_last5: Option<f64>,
    pub rebounds_last5: Option<f64>,
    pub assists_last5: Option<f64>,
}

impl CanonicalFeatureRecord {
    pub fn value(&self, name: FeatureName) -> Option<f64> {
        match name {
            FeatureName::WPct => self.win_pct,
            FeatureName::NetRating => self.net_rating,
            FeatureName::TurnoverPct => self.turnover_pct,
            FeatureName::PlusMinus => self.plus_minus,
            FeatureName::Tov => self.turnovers,
            FeatureName::Fga => self.field_goal_attempts,
            FeatureName::Fta => self.free_throw_attempts,
            FeatureName::Reb => self.rebounds,
            FeatureName::Ast => self.assists,
            FeatureName::WPctLast5 => self.win_pct_last5,
            FeatureName::NetRatingLast5 => self.net_rating_last5,
            FeatureName::TurnoverPctLast5 => self.turnover_pct_last5,
            FeatureName::RebLast5 => self.rebounds_last5,
            FeatureName::AstLast5 => self.assists_last5,
        }
    }

    /// Mutable access to a feature slot. Used when assembling records and by
    /// tests that knock out individual fields.
    pub fn slot_mut(&mut self, name: FeatureName) -> &mut Option<f64> {
        match name {
            FeatureName::WPct => &mut self.win_pct,
            FeatureName::NetRating => &mut self.net_rating,
            FeatureName::TurnoverPct => &mut self.turnover_pct,
            FeatureName::PlusMinus => &mut self.plus_minus,
            FeatureName::Tov => &mut self.turnovers,
            FeatureName::Fga => &mut self.field_goal_attempts,
            FeatureName::Fta => &mut self.free_throw_attempts,
            FeatureName::Reb => &mut self.rebounds,
            FeatureName::Ast => &mut self.assists,
            FeatureName::WPctLast5 => &mut self.win_pct_last5,
            FeatureName::NetRatingLast5 => &mut self.net_rating_last5,
            FeatureName::TurnoverPctLast5 => &mut self.turnover_pct_last5,
            FeatureName::RebLast5 => &mut self.rebounds_last5,
            FeatureName::AstLast5 => &mut self.assists_last5,
        }
    }

    /// Features with no value, in canonical order.
    pub fn missing_features(&self) -> Vec<FeatureName> {
        FeatureName::ALL
            .iter()
            .copied()
            .filter(|name| self.value(*name).is_none())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        FeatureName::ALL.iter().all(|name| self.value(*name).is_some())
    }
}

/// Ordered numeric features for one team, laid out in a model's feature order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Current statistics snapshot, keyed by canonical team name.
pub type StatsByTeam = HashMap<String, CanonicalFeatureRecord>;
