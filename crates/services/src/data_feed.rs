use hoops_ml::{summarize_last5, StatsNormalizer};
use hoops_models::{
    normalize_team_name, team_id, CanonicalFeatureRecord, GameLogRow, Last5Aggregate,
    RawTeamStatRow, Result, StatsByTeam,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Source of raw team statistics. Implementations report "no data" as `None`
/// and never surface transport failures to callers.
pub trait StatsProvider {
    fn team_stats(&self, season: &str) -> Option<Vec<RawTeamStatRow>>;
    fn game_log(&self, season: &str) -> Option<Vec<GameLogRow>>;

    /// Season rows keyed by canonical team name.
    fn stats_by_team(&self, season: &str) -> HashMap<String, RawTeamStatRow> {
        self.team_stats(season)
            .unwrap_or_default()
            .into_iter()
            .map(|row| (normalize_team_name(&row.team_name), row))
            .collect()
    }

    /// Recent form for one team, if it has played any games.
    fn last5(&self, season: &str, team_id: u32) -> Option<Last5Aggregate> {
        let games: Vec<GameLogRow> = self
            .game_log(season)?
            .into_iter()
            .filter(|game| game.team_id == team_id)
            .collect();
        summarize_last5(&games)
    }
}

/// Provider payload persisted as a single JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub season: String,
    #[serde(default)]
    pub team_stats: Vec<RawTeamStatRow>,
    #[serde(default)]
    pub game_log: Vec<GameLogRow>,
}

/// Serves statistics from a snapshot captured earlier.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: StatsSnapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: StatsSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let snapshot: StatsSnapshot = serde_json::from_str(&raw)?;
        info!(
            "📦 Loaded {} season snapshot: {} teams, {} game rows",
            snapshot.season,
            snapshot.team_stats.len(),
            snapshot.game_log.len()
        );
        Ok(Self::new(snapshot))
    }

    pub fn season(&self) -> &str {
        &self.snapshot.season
    }

    fn covers(&self, season: &str) -> bool {
        self.snapshot.season.is_empty() || self.snapshot.season == season
    }
}

impl StatsProvider for SnapshotProvider {
    fn team_stats(&self, season: &str) -> Option<Vec<RawTeamStatRow>> {
        (self.covers(season) && !self.snapshot.team_stats.is_empty())
            .then(|| self.snapshot.team_stats.clone())
    }

    fn game_log(&self, season: &str) -> Option<Vec<GameLogRow>> {
        (self.covers(season) && !self.snapshot.game_log.is_empty())
            .then(|| self.snapshot.game_log.clone())
    }
}

/// How often and how patiently to re-ask a provider that came back empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    /// Spread each delay uniformly over 50%..150% of `delay`.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, rng: &mut impl Rng) -> Duration {
        if self.jitter && !self.delay.is_zero() {
            self.delay.mul_f64(rng.gen_range(0.5..1.5))
        } else {
            self.delay
        }
    }

    /// Calls `fetch` until it yields a value or attempts run out.
    pub fn retry<T>(&self, label: &str, mut fetch: impl FnMut() -> Option<T>) -> Option<T> {
        let attempts = self.max_attempts.max(1);
        let mut rng = rand::thread_rng();
        for attempt in 1..=attempts {
            if let Some(value) = fetch() {
                return Some(value);
            }
            if attempt < attempts {
                let delay = self.delay_for(&mut rng);
                warn!(
                    "⏳ No {} yet (attempt {}/{}), retrying in {:?}",
                    label, attempt, attempts, delay
                );
                thread::sleep(delay);
            }
        }
        warn!("❌ Gave up on {} after {} attempts", label, attempts);
        None
    }
}

/// Wraps a provider so empty answers are retried per a [`RetryPolicy`].
pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: StatsProvider> RetryingProvider<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: StatsProvider> StatsProvider for RetryingProvider<P> {
    fn team_stats(&self, season: &str) -> Option<Vec<RawTeamStatRow>> {
        self.policy.retry("team stats", || {
            self.inner.team_stats(season).filter(|rows| !rows.is_empty())
        })
    }

    fn game_log(&self, season: &str) -> Option<Vec<GameLogRow>> {
        self.policy.retry("game log", || {
            self.inner.game_log(season).filter(|rows| !rows.is_empty())
        })
    }
}

/// Normalizes every team the provider knows into a canonical record. The
/// season and the game log are each fetched once.
pub fn collect_records<P>(provider: &P, season: &str) -> Vec<CanonicalFeatureRecord>
where
    P: StatsProvider + ?Sized,
{
    let normalizer = StatsNormalizer::new();
    let Some(rows) = provider.team_stats(season) else {
        warn!("⚠️  No team stats available for {}", season);
        return Vec::new();
    };

    let mut games_by_team: HashMap<u32, Vec<GameLogRow>> = HashMap::new();
    match provider.game_log(season) {
        Some(log) => {
            for game in log {
                games_by_team.entry(game.team_id).or_default().push(game);
            }
        }
        None => warn!("⚠️  No game log for {}, recent form left unset", season),
    }

    rows.iter()
        .map(|row| {
            let id = team_id(&row.team_name).unwrap_or(row.team_id);
            let last5 = games_by_team
                .get(&id)
                .and_then(|games| summarize_last5(games));
            debug!("🔑 {} (id {}): last-5 form {}", row.team_name, id, last5.is_some());
            normalizer.normalize(row, last5.as_ref())
        })
        .collect()
}

/// Keys records by canonical team name. A later record for the same team
/// replaces an earlier one.
pub fn index_by_team(records: impl IntoIterator<Item = CanonicalFeatureRecord>) -> StatsByTeam {
    records
        .into_iter()
        .map(|record| (normalize_team_name(&record.team_name), record))
        .collect()
}
