// Common test utilities and helpers
#![allow(dead_code)]

use chrono::NaiveDate;
use std::path::PathBuf;
use uuid::Uuid;

use hoops_models::{CanonicalFeatureRecord, FeatureName, GameLogRow, RawTeamStatRow, StatsByTeam, Team, TEAMS};
use hoops_services::StatsSnapshot;

pub const SEASON: &str = "2024-25";
pub const GAMES_PLAYED: u32 = 20;
pub const SCHEDULE_DAYS: u32 = 6;

/// League strength of the team at `index` in the team table: the last team
/// is the strongest.
pub fn strength(index: usize) -> f64 {
    index as f64 - 14.5
}

/// A fully populated record with the given season net rating.
pub fn create_standard_record(team: &str, net_rating: f64) -> CanonicalFeatureRecord {
    let mut record = CanonicalFeatureRecord {
        team_name: team.to_string(),
        ..Default::default()
    };
    for name in FeatureName::ALL {
        *record.slot_mut(name) = Some(1.0);
    }
    record.net_rating = Some(net_rating);
    record.net_rating_last5 = Some(net_rating);
    record
}

pub fn create_standard_stats() -> StatsByTeam {
    [
        create_standard_record("Boston Celtics", 8.0),
        create_standard_record("Miami Heat", -2.0),
    ]
    .into_iter()
    .map(|record| (record.team_name.clone(), record))
    .collect()
}

fn season_row(index: usize, team: &Team) -> RawTeamStatRow {
    let s = strength(index);
    let wins = (10.0 + s * 0.6).round() as u32;
    RawTeamStatRow {
        team_id: team.id,
        team_name: team.name.to_string(),
        games_played: GAMES_PLAYED,
        wins,
        losses: GAMES_PLAYED - wins,
        win_pct: f64::from(wins) / f64::from(GAMES_PLAYED),
        plus_minus: s * f64::from(GAMES_PLAYED),
        turnovers: 290.0 - 2.0 * s,
        field_goal_attempts: 1760.0 + 3.0 * s,
        free_throw_attempts: 420.0 + s,
        rebounds: 870.0 + 4.0 * s,
        assists: 510.0 + 3.0 * s,
    }
}

fn game_row(
    game_id: &str,
    date: NaiveDate,
    (index, team): (usize, &Team),
    (opponent_index, opponent): (usize, &Team),
    home: bool,
) -> GameLogRow {
    let margin = (strength(index) - strength(opponent_index)) * 2.0;
    let matchup = if home {
        format!("{} vs. {}", team.abbreviation, opponent.abbreviation)
    } else {
        format!("{} @ {}", team.abbreviation, opponent.abbreviation)
    };
    GameLogRow {
        game_id: game_id.to_string(),
        game_date: date,
        team_id: team.id,
        team_name: team.name.to_string(),
        matchup,
        wl: if margin > 0.0 { "W" } else { "L" }.to_string(),
        plus_minus: margin,
        turnovers: 14.0,
        field_goal_attempts: 88.0,
        free_throw_attempts: 21.0,
        rebounds: 44.0 + margin / 4.0,
        assists: 25.0 + margin / 8.0,
    }
}

/// A whole league where the stronger team always wins. Every team plays once
/// per schedule day, so everybody has recent form.
pub fn create_standard_snapshot() -> StatsSnapshot {
    let team_stats = TEAMS
        .iter()
        .enumerate()
        .map(|(index, team)| season_row(index, team))
        .collect();

    let n = TEAMS.len();
    let mut game_log = Vec::new();
    for day in 1..=SCHEDULE_DAYS {
        let date = NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        let rotation: Vec<usize> = (0..n).map(|j| (j + day as usize) % n).collect();
        for k in 0..n / 2 {
            let home = rotation[k];
            let away = rotation[n - 1 - k];
            let game_id = format!("0022400{day:02}{k:02}");
            game_log.push(game_row(&game_id, date, (home, &TEAMS[home]), (away, &TEAMS[away]), true));
            game_log.push(game_row(&game_id, date, (away, &TEAMS[away]), (home, &TEAMS[home]), false));
        }
    }

    StatsSnapshot {
        season: SEASON.to_string(),
        team_stats,
        game_log,
    }
}

/// A unique path under the system temp dir.
pub fn temp_path(prefix: &str, extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{}-{}.{}", prefix, Uuid::new_v4(), extension))
}
