// Feature engineering

use hoops_models::{
    normalize_team_name, CanonicalFeatureRecord, FeatureName, FeatureVector, GameLogRow,
    IncompleteData, Last5Aggregate, RawTeamStatRow,
};
use tracing::debug;

/// Free throws that end a possession, per the standard possession estimator.
pub const FREE_THROW_POSSESSION_FACTOR: f64 = 0.44;

/// Games that make up the recent-form window.
pub const LAST_N_GAMES: usize = 5;

/// Share of estimated possessions ending in a turnover, as a percentage.
pub fn turnover_pct(turnovers: f64, field_goal_attempts: f64, free_throw_attempts: f64) -> f64 {
    let possessions =
        field_goal_attempts + FREE_THROW_POSSESSION_FACTOR * free_throw_attempts + turnovers;
    if possessions > 0.0 {
        100.0 * turnovers / possessions
    } else {
        0.0
    }
}

/// Per-game point differential.
pub fn net_rating(plus_minus: f64, games_played: u32) -> f64 {
    if games_played > 0 {
        plus_minus / f64::from(games_played)
    } else {
        0.0
    }
}

/// Aggregates a team's most recent games into recent-form metrics.
///
/// Rows may arrive in any order; the latest [`LAST_N_GAMES`] by date are used.
/// Returns `None` when there are no games.
pub fn summarize_last5(games: &[GameLogRow]) -> Option<Last5Aggregate> {
    if games.is_empty() {
        return None;
    }
    let mut recent: Vec<&GameLogRow> = games.iter().collect();
    recent.sort_by(|a, b| b.game_date.cmp(&a.game_date));
    recent.truncate(LAST_N_GAMES);

    let n = recent.len() as f64;
    let wins = recent.iter().filter(|game| game.is_win()).count() as f64;
    let sum = |field: fn(&GameLogRow) -> f64| recent.iter().map(|game| field(game)).sum::<f64>();

    Some(Last5Aggregate {
        win_pct: Some(wins / n),
        net_rating: Some(sum(|g: &GameLogRow| g.plus_minus) / n),
        turnover_pct: Some(turnover_pct(
            sum(|g: &GameLogRow| g.turnovers),
            sum(|g: &GameLogRow| g.field_goal_attempts),
            sum(|g: &GameLogRow| g.free_throw_attempts),
        )),
        rebounds: Some(sum(|g: &GameLogRow| g.rebounds) / n),
        assists: Some(sum(|g: &GameLogRow| g.assists) / n),
    })
}

/// Maps provider rows onto canonical feature records.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsNormalizer;

impl StatsNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Builds the record for one team. Recent-form fields stay unset unless a
    /// complete last-5 aggregate is supplied; they are never zero-filled.
    pub fn normalize(
        &self,
        raw: &RawTeamStatRow,
        last5: Option<&Last5Aggregate>,
    ) -> CanonicalFeatureRecord {
        let team_name = normalize_team_name(&raw.team_name);
        let last5 = last5.filter(|agg| agg.is_complete());
        if last5.is_none() {
            debug!("No complete last-5 form for {}", team_name);
        }

        CanonicalFeatureRecord {
            team_name,
            win_pct: Some(raw.win_pct),
            net_rating: Some(net_rating(raw.plus_minus, raw.games_played)),
            turnover_pct: Some(turnover_pct(
                raw.turnovers,
                raw.field_goal_attempts,
                raw.free_throw_attempts,
            )),
            plus_minus: Some(raw.plus_minus),
            turnovers: Some(raw.turnovers),
            field_goal_attempts: Some(raw.field_goal_attempts),
            free_throw_attempts: Some(raw.free_throw_attempts),
            rebounds: Some(raw.rebounds),
            assists: Some(raw.assists),
            win_pct_last5: last5.and_then(|agg| agg.win_pct),
            net_rating_last5: last5.and_then(|agg| agg.net_rating),
            turnover_pct_last5: last5.and_then(|agg| agg.turnover_pct),
            rebounds_last5: last5.and_then(|agg| agg.rebounds),
            assists_last5: last5.and_then(|agg| agg.assists),
        }
    }
}

/// Lays a record out as a numeric vector in a given feature order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureVectorBuilder;

impl FeatureVectorBuilder {
    /// Fails with every missing feature named when any value is absent or not
    /// finite. Missing values are never substituted.
    pub fn build(
        record: &CanonicalFeatureRecord,
        order: &[FeatureName],
    ) -> Result<FeatureVector, IncompleteData> {
        let mut values = Vec::with_capacity(order.len());
        let mut missing = Vec::new();
        for name in order {
            match record.value(*name) {
                Some(value) if value.is_finite() => values.push(value),
                _ => missing.push(*name),
            }
        }

        if missing.is_empty() {
            Ok(FeatureVector::new(values))
        } else {
            Err(IncompleteData {
                team: record.team_name.clone(),
                missing,
            })
        }
    }
}
