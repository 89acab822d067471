//! NBA franchise table and team-name canonicalization.
//!
//! Every statistics source spells team names differently ("NYK", "NY Knicks",
//! "New York Knicks"). All lookups go through [`normalize_team_name`] so that a
//! single canonical string is the join key everywhere.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// A franchise as known to the stats provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: u32,
    pub name: &'static str,
    pub abbreviation: &'static str,
}

pub const TEAMS: [Team; 30] = [
    Team { id: 1_610_612_737, name: "Atlanta Hawks", abbreviation: "ATL" },
    Team { id: 1_610_612_738, name: "Boston Celtics", abbreviation: "BOS" },
    Team { id: 1_610_612_739, name: "Cleveland Cavaliers", abbreviation: "CLE" },
    Team { id: 1_610_612_740, name: "New Orleans Pelicans", abbreviation: "NOP" },
    Team { id: 1_610_612_741, name: "Chicago Bulls", abbreviation: "CHI" },
    Team { id: 1_610_612_742, name: "Dallas Mavericks", abbreviation: "DAL" },
    Team { id: 1_610_612_743, name: "Denver Nuggets", abbreviation: "DEN" },
    Team { id: 1_610_612_744, name: "Golden State Warriors", abbreviation: "GSW" },
    Team { id: 1_610_612_745, name: "Houston Rockets", abbreviation: "HOU" },
    Team { id: 1_610_612_746, name: "LA Clippers", abbreviation: "LAC" },
    Team { id: 1_610_612_747, name: "Los Angeles Lakers", abbreviation: "LAL" },
    Team { id: 1_610_612_748, name: "Miami Heat", abbreviation: "MIA" },
    Team { id: 1_610_612_749, name: "Milwaukee Bucks", abbreviation: "MIL" },
    Team { id: 1_610_612_750, name: "Minnesota Timberwolves", abbreviation: "MIN" },
    Team { id: 1_610_612_751, name: "Brooklyn Nets", abbreviation: "BKN" },
    Team { id: 1_610_612_752, name: "New York Knicks", abbreviation: "NYK" },
    Team { id: 1_610_612_753, name: "Orlando Magic", abbreviation: "ORL" },
    Team { id: 1_610_612_754, name: "Indiana Pacers", abbreviation: "IND" },
    Team { id: 1_610_612_755, name: "Philadelphia 76ers", abbreviation: "PHI" },
    Team { id: 1_610_612_756, name: "Phoenix Suns", abbreviation: "PHX" },
    Team { id: 1_610_612_757, name: "Portland Trail Blazers", abbreviation: "POR" },
    Team { id: 1_610_612_758, name: "Sacramento Kings", abbreviation: "SAC" },
    Team { id: 1_610_612_759, name: "San Antonio Spurs", abbreviation: "SAS" },
    Team { id: 1_610_612_760, name: "Oklahoma City Thunder", abbreviation: "OKC" },
    Team { id: 1_610_612_761, name: "Toronto Raptors", abbreviation: "TOR" },
    Team { id: 1_610_612_762, name: "Utah Jazz", abbreviation: "UTA" },
    Team { id: 1_610_612_763, name: "Memphis Grizzlies", abbreviation: "MEM" },
    Team { id: 1_610_612_764, name: "Washington Wizards", abbreviation: "WAS" },
    Team { id: 1_610_612_765, name: "Detroit Pistons", abbreviation: "DET" },
    Team { id: 1_610_612_766, name: "Charlotte Hornets", abbreviation: "CHA" },
];

/// Short forms seen in schedules and box scores that are not abbreviations.
const EXTRA_ALIASES: [(&str, &str); 9] = [
    ("NY Knicks", "New York Knicks"),
    ("SA Spurs", "San Antonio Spurs"),
    ("GS Warriors", "Golden State Warriors"),
    ("OKC Thunder", "Oklahoma City Thunder"),
    ("Los Angeles Clippers", "LA Clippers"),
    ("NY", "New York Knicks"),
    ("NO", "New Orleans Pelicans"),
    ("GS", "Golden State Warriors"),
    ("SA", "San Antonio Spurs"),
];

static ALIASES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    TEAMS
        .iter()
        .map(|team| (team.abbreviation, team.name))
        .chain(EXTRA_ALIASES)
        .collect()
});

/// Returns the canonical name for `name`.
///
/// Aliases resolve exactly; canonical names match case-insensitively; anything
/// else passes through trimmed. Applying it twice is the same as applying it once.
pub fn normalize_team_name(name: &str) -> String {
    let trimmed = name.trim();
    if let Some(canonical) = ALIASES.get(trimmed) {
        return (*canonical).to_string();
    }
    TEAMS
        .iter()
        .find(|team| team.name.eq_ignore_ascii_case(trimmed))
        .map_or_else(|| trimmed.to_string(), |team| team.name.to_string())
}

/// Looks a franchise up by any accepted spelling of its name.
pub fn find_team(name: &str) -> Option<&'static Team> {
    let canonical = normalize_team_name(name);
    TEAMS.iter().find(|team| team.name == canonical)
}

/// Provider team id for any accepted spelling of a team name.
pub fn team_id(name: &str) -> Option<u32> {
    find_team(name).map(|team| team.id)
}

/// Canonical name for a provider team id.
pub fn team_name(id: u32) -> Option<&'static str> {
    TEAMS.iter().find(|team| team.id == id).map(|team| team.name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_aliases_resolve_to_one_name() {
        for alias in ["NYK", "NY Knicks", "NY", "New York Knicks", " New York Knicks "] {
            assert_eq!(normalize_team_name(alias), "New York Knicks");
        }
        assert_eq!(normalize_team_name("Los Angeles Clippers"), "LA Clippers");
        assert_eq!(normalize_team_name("LAC"), "LA Clippers");
        assert_eq!(normalize_team_name("boston celtics"), "Boston Celtics");
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(normalize_team_name("Seattle SuperSonics"), "Seattle SuperSonics");
        assert_eq!(team_id("Seattle SuperSonics"), None);
    }

    #[test]
    fn test_every_alias_is_idempotent() {
        let inputs = ALIASES
            .keys()
            .copied()
            .chain(TEAMS.iter().map(|team| team.name));
        for input in inputs {
            let once = normalize_team_name(input);
            assert_eq!(normalize_team_name(&once), once, "alias {input}");
        }
    }

    #[test]
    fn test_alias_targets_are_canonical() {
        for target in ALIASES.values() {
            assert!(TEAMS.iter().any(|team| team.name == *target), "{target}");
        }
    }

    #[test]
    fn test_team_ids() {
        assert_eq!(team_id("BOS"), Some(1_610_612_738));
        assert_eq!(team_id("Los Angeles Clippers"), Some(1_610_612_746));
        assert_eq!(team_name(1_610_612_748), Some("Miami Heat"));
        assert_eq!(team_name(42), None);
    }

    proptest! {
        #[test]
        fn prop_normalization_is_idempotent(name in "[A-Za-z .]{0,24}") {
            let once = normalize_team_name(&name);
            prop_assert_eq!(normalize_team_name(&once), once);
        }
    }
}
