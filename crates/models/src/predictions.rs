use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::stats::FeatureVector;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PredictedOutcome {
    HomeWin,
    AwayWin,
}

/// Head-to-head split of two independent per-team win probabilities.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HeadToHead {
    pub home: f64,
    pub away: f64,
}

impl HeadToHead {
    /// Normalizes raw class-1 probabilities so the pair sums to one.
    ///
    /// Each raw value is treated as an independent strength score; this is an
    /// approximation, not a joint model of the matchup. A degenerate pair
    /// (non-positive or non-finite sum) splits evenly.
    pub fn from_raw(home_raw: f64, away_raw: f64) -> Self {
        let total = home_raw + away_raw;
        if !total.is_finite() || total <= 0.0 {
            return Self { home: 0.5, away: 0.5 };
        }
        let home = home_raw / total;
        Self { home, away: 1.0 - home }
    }

    /// Home wins only on a strictly higher probability; exact ties go away.
    pub fn outcome(&self) -> PredictedOutcome {
        if self.home > self.away {
            PredictedOutcome::HomeWin
        } else {
            PredictedOutcome::AwayWin
        }
    }
}

/// Feature vectors a prediction was computed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInput {
    pub home: FeatureVector,
    pub away: FeatureVector,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub id: Uuid,
    pub model_name: String,
    pub model_version: String,
    pub home_team: String,
    pub away_team: String,
    pub winner: String,
    pub outcome: PredictedOutcome,
    /// Percent, rounded to two decimals.
    pub home_win_prob: f64,
    /// Percent, rounded to two decimals.
    pub away_win_prob: f64,
    pub model_input: ModelInput,
    pub predicted_at: DateTime<Utc>,
}

impl PredictionResult {
    pub fn new(
        model_name: String,
        model_version: String,
        home_team: String,
        away_team: String,
        split: HeadToHead,
        model_input: ModelInput,
    ) -> Self {
        let outcome = split.outcome();
        let winner = match outcome {
            PredictedOutcome::HomeWin => home_team.clone(),
            PredictedOutcome::AwayWin => away_team.clone(),
        };

        Self {
            id: Uuid::new_v4(),
            model_name,
            model_version,
            home_team,
            away_team,
            winner,
            outcome,
            home_win_prob: as_percent(split.home),
            away_win_prob: as_percent(split.away),
            model_input,
            predicted_at: Utc::now(),
        }
    }
}

/// Probability in [0, 1] to a percentage with two decimals.
pub fn as_percent(prob: f64) -> f64 {
    (prob * 10_000.0).round() / 100.0
}

/// Outcome of replaying completed games through the predictor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AccuracyReport {
    pub correct: u32,
    pub evaluated: u32,
    /// Games with no prediction; excluded from `correct` and `evaluated`.
    pub skipped: u32,
    /// `None` until at least one game has been evaluated.
    pub accuracy: Option<f64>,
}

impl AccuracyReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, is_correct: bool) {
        self.evaluated += 1;
        if is_correct {
            self.correct += 1;
        }
        self.accuracy = Some(f64::from(self.correct) / f64::from(self.evaluated));
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn input() -> ModelInput {
        ModelInput {
            home: FeatureVector::new(vec![1.0]),
            away: FeatureVector::new(vec![2.0]),
        }
    }

    #[test]
    fn test_head_to_head_normalization() {
        let split = HeadToHead::from_raw(0.6, 0.2);
        assert!((split.home - 0.75).abs() < 1e-12);
        assert!((split.away - 0.25).abs() < 1e-12);
        assert_eq!(split.outcome(), PredictedOutcome::HomeWin);
    }

    #[test]
    fn test_exact_tie_goes_to_away_team() {
        let split = HeadToHead::from_raw(0.4, 0.4);
        assert_eq!(split.outcome(), PredictedOutcome::AwayWin);

        let result = PredictionResult::new(
            "m".to_string(),
            "v1".to_string(),
            "Boston Celtics".to_string(),
            "Miami Heat".to_string(),
            split,
            input(),
        );
        assert_eq!(result.winner, "Miami Heat");
        assert_eq!(result.home_win_prob, 50.0);
        assert_eq!(result.away_win_prob, 50.0);
    }

    #[test]
    fn test_degenerate_raw_probabilities_split_evenly() {
        assert_eq!(HeadToHead::from_raw(0.0, 0.0), HeadToHead { home: 0.5, away: 0.5 });
        assert_eq!(HeadToHead::from_raw(f64::NAN, 0.3), HeadToHead { home: 0.5, away: 0.5 });
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(as_percent(0.123_456), 12.35);
        assert_eq!(as_percent(2.0 / 3.0), 66.67);
        assert_eq!(as_percent(1.0), 100.0);
    }

    #[test]
    fn test_accuracy_report() {
        let mut report = AccuracyReport::new();
        assert_eq!(report.accuracy, None);

        report.record(true);
        report.record(true);
        report.record(false);
        report.record_skip();

        assert_eq!(report.correct, 2);
        assert_eq!(report.evaluated, 3);
        assert_eq!(report.skipped, 1);
        assert!((report.accuracy.unwrap() - 0.666_666_666_666_666_6).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_normalized_pair_sums_to_one(home in 1e-9f64..1.0, away in 1e-9f64..1.0) {
            let split = HeadToHead::from_raw(home, away);
            prop_assert!((split.home + split.away - 1.0).abs() < 1e-12);
            prop_assert!((0.0..=1.0).contains(&split.home));
        }
    }
}
