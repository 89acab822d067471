// Accuracy evaluation over completed games

use hoops_models::{normalize_team_name, AccuracyReport, HistoricalGame, StatsByTeam};
use tracing::{debug, info, warn};

use crate::predictor::PredictorService;

/// Replays completed games through a predictor and scores its picks.
pub struct AccuracyEvaluator<'a> {
    predictor: &'a PredictorService,
}

impl<'a> AccuracyEvaluator<'a> {
    pub fn new(predictor: &'a PredictorService) -> Self {
        Self { predictor }
    }

    /// Games without a prediction are skipped: they count neither as correct
    /// nor toward the evaluated total.
    pub fn evaluate(&self, games: &[HistoricalGame], stats: &StatsByTeam) -> AccuracyReport {
        let mut report = AccuracyReport::new();
        if !self.predictor.is_ready() {
            warn!(
                "❌ No win probability model loaded; all {} games will be skipped",
                games.len()
            );
        }

        for game in games {
            match self.predictor.predict_winner(&game.home_team, &game.away_team, stats) {
                Ok(prediction) => {
                    let actual = normalize_team_name(&game.actual_winner);
                    report.record(prediction.winner == actual);
                }
                Err(reason) => {
                    debug!(
                        "Skipping game {} {} vs {}: {}",
                        game.game_id, game.home_team, game.away_team, reason
                    );
                    report.record_skip();
                }
            }
        }

        match report.accuracy {
            Some(accuracy) => info!(
                "✅ Model accuracy: {:.2}% ({}/{}, {} skipped)",
                accuracy * 100.0,
                report.correct,
                report.evaluated,
                report.skipped
            ),
            None => warn!("⚠️  No valid games to evaluate accuracy ({} skipped)", report.skipped),
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hoops_ml::NetRatingModel;
    use hoops_models::{CanonicalFeatureRecord, FeatureName};
    use std::sync::Arc;

    fn record(team: &str, net_rating: f64) -> CanonicalFeatureRecord {
        let mut record = CanonicalFeatureRecord {
            team_name: team.to_string(),
            ..Default::default()
        };
        for name in FeatureName::ALL {
            *record.slot_mut(name) = Some(0.0);
        }
        record.net_rating = Some(net_rating);
        record
    }

    fn game(id: &str, home: &str, away: &str, winner: &str) -> HistoricalGame {
        HistoricalGame {
            game_id: id.to_string(),
            game_date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            actual_winner: winner.to_string(),
        }
    }

    fn stats() -> StatsByTeam {
        let mut incomplete = record("Utah Jazz", -9.0);
        incomplete.assists_last5 = None;
        [
            record("Boston Celtics", 8.0),
            record("Miami Heat", -2.0),
            record("Denver Nuggets", 4.0),
            incomplete,
        ]
        .into_iter()
        .map(|r| (r.team_name.clone(), r))
        .collect()
    }

    #[test]
    fn test_skipped_games_do_not_count() {
        let predictor = PredictorService::with_model(Arc::new(NetRatingModel::new()));
        let games = vec![
            game("1", "Boston Celtics", "Miami Heat", "Boston Celtics"),
            game("2", "Miami Heat", "Denver Nuggets", "MIA"),
            game("3", "Denver Nuggets", "Boston Celtics", "Boston Celtics"),
            game("4", "Chicago Bulls", "Miami Heat", "Chicago Bulls"),
            game("5", "Utah Jazz", "Boston Celtics", "Utah Jazz"),
        ];

        let report = AccuracyEvaluator::new(&predictor).evaluate(&games, &stats());
        assert_eq!(report.evaluated, 3);
        assert_eq!(report.correct, 2);
        assert_eq!(report.skipped, 2);
        assert!((report.accuracy.unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    /// Collects formatted log output for inspection.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_missing_model_warns_once_per_run() {
        let predictor = PredictorService::new();
        let games: Vec<HistoricalGame> = (0..25)
            .map(|i| game(&i.to_string(), "Boston Celtics", "Miami Heat", "Boston Celtics"))
            .collect();

        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();
        let report = tracing::subscriber::with_default(subscriber, || {
            AccuracyEvaluator::new(&predictor).evaluate(&games, &stats())
        });
        assert_eq!(report.skipped, 25);

        let logs = String::from_utf8(buffer.0.lock().clone()).unwrap();
        let warnings: Vec<&str> = logs.lines().filter(|line| line.contains("WARN")).collect();
        assert_eq!(
            warnings
                .iter()
                .filter(|line| line.contains("No win probability model loaded"))
                .count(),
            1
        );
        assert!(!warnings.iter().any(|line| line.contains("cannot predict")));
    }

    #[test]
    fn test_nothing_evaluated_without_model() {
        let predictor = PredictorService::new();
        let games = vec![game("1", "Boston Celtics", "Miami Heat", "Boston Celtics")];

        let report = AccuracyEvaluator::new(&predictor).evaluate(&games, &stats());
        assert_eq!(report.evaluated, 0);
        assert_eq!(report.correct, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.accuracy, None);
    }
}
