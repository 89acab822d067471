// Model training

use chrono::Utc;
use hoops_models::{
    CanonicalFeatureRecord, FeatureName, FeatureVector, HoopsError, IncompleteData, Result,
};
use linfa::prelude::*;
use linfa_logistic::LogisticRegression;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::evaluation::holdout_metrics;
use crate::features::FeatureVectorBuilder;
use crate::models::{TrainedClassifier, TrainingSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Seed for the train/held-out shuffle.
    pub seed: u64,
    pub held_out_ratio: f64,
    /// Fewest complete examples a training run accepts.
    pub min_examples: usize,
    /// L2 penalty.
    pub alpha: f64,
    pub max_iterations: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            held_out_ratio: 0.2,
            min_examples: 10,
            alpha: 1.0,
            max_iterations: 1000,
        }
    }
}

/// One team snapshot as a labelled training row.
///
/// The label is whether the team's season net rating is positive: a
/// season-level strength heuristic, not the outcome of any particular game.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    pub team: String,
    pub features: FeatureVector,
    pub label: bool,
}

impl TrainingExample {
    pub fn from_record(
        record: &CanonicalFeatureRecord,
        order: &[FeatureName],
    ) -> std::result::Result<Self, IncompleteData> {
        let features = FeatureVectorBuilder::build(record, order)?;
        Ok(Self {
            team: record.team_name.clone(),
            features,
            label: record.net_rating.is_some_and(|rating| rating > 0.0),
        })
    }
}

pub struct ModelTrainer {
    config: TrainingConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Feature order every classifier from this trainer is fitted with.
    pub fn feature_order(&self) -> &'static [FeatureName] {
        &FeatureName::ALL
    }

    /// One example per complete record. Incomplete records are dropped, never
    /// imputed.
    pub fn build_examples(&self, records: &[CanonicalFeatureRecord]) -> Vec<TrainingExample> {
        let examples: Vec<TrainingExample> = records
            .iter()
            .filter_map(|record| match TrainingExample::from_record(record, self.feature_order()) {
                Ok(example) => Some(example),
                Err(incomplete) => {
                    debug!("Dropping training record: {}", incomplete);
                    None
                }
            })
            .collect();

        let dropped = records.len() - examples.len();
        if dropped > 0 {
            warn!("⚠️  Dropped {} incomplete of {} records", dropped, records.len());
        }
        examples
    }

    /// Reproducible train/held-out partition of `n` example indices.
    pub fn split(&self, n: usize) -> (Vec<usize>, Vec<usize>) {
        let ratio = self.config.held_out_ratio.clamp(0.0, 1.0);
        let held_out = ((n as f64 * ratio).ceil() as usize).min(n.saturating_sub(1));

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        indices.shuffle(&mut rng);

        let train = indices.split_off(held_out);
        (train, indices)
    }

    /// Builds examples from `records` and fits a classifier on them.
    pub fn train(&self, records: &[CanonicalFeatureRecord]) -> Result<TrainedClassifier> {
        let examples = self.build_examples(records);
        info!("🧪 Training on {} teams after dropping incomplete records", examples.len());
        self.fit_examples(&examples)
    }

    pub fn fit_examples(&self, examples: &[TrainingExample]) -> Result<TrainedClassifier> {
        if examples.len() < self.config.min_examples {
            return Err(HoopsError::InsufficientData {
                found: examples.len(),
                required: self.config.min_examples,
            });
        }

        let (train_idx, held_out_idx) = self.split(examples.len());
        let train: Vec<&TrainingExample> = train_idx.iter().map(|&i| &examples[i]).collect();
        let held_out: Vec<(FeatureVector, bool)> = held_out_idx
            .iter()
            .map(|&i| (examples[i].features.clone(), examples[i].label))
            .collect();

        let positives = train.iter().filter(|example| example.label).count();
        if positives == 0 || positives == train.len() {
            return Err(HoopsError::DegenerateLabels);
        }

        let order = self.feature_order();
        let records = to_matrix(&train, order.len())?;
        let offsets = records
            .mean_axis(Axis(0))
            .ok_or_else(|| HoopsError::Training("empty training partition".to_string()))?;
        let scales = records
            .std_axis(Axis(0), 0.0)
            .mapv(|std| if std.is_finite() && std > f64::EPSILON { 1.0 / std } else { 1.0 });
        let standardized = (&records - &offsets) * &scales;
        let targets: Array1<bool> = train.iter().map(|example| example.label).collect();

        let dataset = Dataset::new(standardized, targets);
        let fitted = LogisticRegression::default()
            .alpha(self.config.alpha)
            .max_iterations(self.config.max_iterations)
            .fit(&dataset)
            .map_err(|e| HoopsError::Training(e.to_string()))?;

        // The fitted model reports probabilities for whichever label it treats as
        // positive; flip the parameters if that is the losing class.
        let probabilities = fitted.predict_probabilities(dataset.records());
        let predicted = fitted.predict(dataset.records());
        let positive_is_win = probabilities
            .iter()
            .zip(predicted.iter())
            .find(|(prob, _)| (**prob - 0.5).abs() > 1e-6)
            .map_or(true, |(prob, label)| (*prob > 0.5) == *label);
        let sign = if positive_is_win { 1.0 } else { -1.0 };

        let mut classifier = TrainedClassifier {
            name: TrainedClassifier::NAME.to_string(),
            version: TrainedClassifier::VERSION.to_string(),
            feature_order: order.to_vec(),
            offsets: offsets.to_vec(),
            scales: scales.to_vec(),
            weights: fitted.params().iter().map(|w| sign * w).collect(),
            intercept: sign * fitted.intercept(),
            trained_at: Utc::now(),
            summary: TrainingSummary {
                examples: examples.len(),
                train_size: train.len(),
                held_out_size: held_out.len(),
                held_out_accuracy: None,
                held_out_brier: None,
                positive_rate: examples.iter().filter(|example| example.label).count() as f64
                    / examples.len() as f64,
            },
        };

        if let Some(metrics) = holdout_metrics(&classifier, &held_out) {
            classifier.summary.held_out_accuracy = Some(metrics.accuracy);
            classifier.summary.held_out_brier = Some(metrics.brier_score);
            info!(
                "✅ Held-out accuracy {:.1}% over {} teams (Brier {:.3})",
                metrics.accuracy * 100.0,
                held_out.len(),
                metrics.brier_score
            );
        }

        Ok(classifier)
    }
}

fn to_matrix(examples: &[&TrainingExample], width: usize) -> Result<Array2<f64>> {
    let flat: Vec<f64> = examples
        .iter()
        .flat_map(|example| example.features.as_slice().iter().copied())
        .collect();
    Array2::from_shape_vec((examples.len(), width), flat)
        .map_err(|e| HoopsError::Training(format!("feature matrix: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WinProbabilityModel;

    /// Deterministic league where every statistic tracks team strength.
    fn team(i: usize, strength: f64) -> CanonicalFeatureRecord {
        let jitter = ((i * 7919) % 13) as f64 / 13.0;
        CanonicalFeatureRecord {
            team_name: format!("Team {i}"),
            win_pct: Some((0.5 + strength / 40.0).clamp(0.0, 1.0)),
            net_rating: Some(strength),
            turnover_pct: Some(13.0 - strength / 10.0 + jitter),
            plus_minus: Some(strength * 60.0),
            turnovers: Some(900.0 + 30.0 * jitter),
            field_goal_attempts: Some(7200.0 + 100.0 * jitter),
            free_throw_attempts: Some(1700.0 + strength * 5.0),
            rebounds: Some(3600.0 + strength * 10.0),
            assists: Some(2100.0 + strength * 12.0 + 20.0 * jitter),
            win_pct_last5: Some((0.5 + strength / 25.0).clamp(0.0, 1.0)),
            net_rating_last5: Some(strength + jitter * 2.0 - 1.0),
            turnover_pct_last5: Some(13.5 - strength / 12.0),
            rebounds_last5: Some(44.0 + strength / 5.0),
            assists_last5: Some(25.0 + strength / 4.0 + jitter),
        }
    }

    fn league(n: usize) -> Vec<CanonicalFeatureRecord> {
        let mid = (n as f64 - 1.0) / 2.0;
        (0..n).map(|i| team(i, i as f64 - mid)).collect()
    }

    fn incomplete(i: usize) -> CanonicalFeatureRecord {
        let mut record = team(100 + i, 3.0);
        record.net_rating_last5 = None;
        record
    }

    #[test]
    fn test_examples_are_labelled_by_net_rating_sign() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let examples = trainer.build_examples(&[team(0, 4.0), team(1, -4.0), team(2, 0.0)]);
        let labels: Vec<bool> = examples.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![true, false, false]);
    }

    #[test]
    fn test_incomplete_records_are_dropped() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let mut records = league(12);
        records.extend((0..3).map(incomplete));

        let examples = trainer.build_examples(&records);
        assert_eq!(examples.len(), 12);
        let dropped = ["Team 100", "Team 101", "Team 102"];
        assert!(examples.iter().all(|e| !dropped.contains(&e.team.as_str())));

        let classifier = trainer.train(&records).unwrap();
        assert_eq!(classifier.summary.examples, 12);
        assert_eq!(classifier.summary.held_out_size, 3);
        assert_eq!(classifier.summary.train_size, 9);
    }

    #[test]
    fn test_too_few_complete_examples() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let mut records = league(9);
        records.extend((0..5).map(incomplete));

        match trainer.train(&records) {
            Err(HoopsError::InsufficientData { found, required }) => {
                assert_eq!(found, 9);
                assert_eq!(required, 10);
            }
            other => panic!("expected InsufficientData, got {other:?}"),
        }
    }

    #[test]
    fn test_single_class_is_rejected() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let records: Vec<_> = (0..12).map(|i| team(i, 1.0 + i as f64)).collect();
        assert!(matches!(trainer.train(&records), Err(HoopsError::DegenerateLabels)));
    }

    #[test]
    fn test_split_is_reproducible_and_disjoint() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let (train_a, held_a) = trainer.split(30);
        let (train_b, held_b) = trainer.split(30);
        assert_eq!(train_a, train_b);
        assert_eq!(held_a, held_b);
        assert_eq!(held_a.len(), 6);
        assert_eq!(train_a.len(), 24);
        assert!(held_a.iter().all(|i| !train_a.contains(i)));
    }

    #[test]
    fn test_training_is_repeatable() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let records = league(30);
        let first = trainer.train(&records).unwrap();
        let second = trainer.train(&records).unwrap();

        assert_eq!(first.feature_order, FeatureName::ALL.to_vec());
        for (a, b) in first.weights.iter().zip(&second.weights) {
            assert!((a - b).abs() < 1e-9);
        }
        assert!((first.intercept - second.intercept).abs() < 1e-9);
    }

    #[test]
    fn test_classifier_ranks_stronger_teams_higher() {
        let trainer = ModelTrainer::new(TrainingConfig::default());
        let records = league(30);
        let classifier = trainer.train(&records).unwrap();

        let strongest = FeatureVectorBuilder::build(&records[29], &FeatureName::ALL).unwrap();
        let weakest = FeatureVectorBuilder::build(&records[0], &FeatureName::ALL).unwrap();
        let p_strong = classifier.win_probability(&strongest);
        let p_weak = classifier.win_probability(&weakest);

        assert!(p_strong > p_weak);
        assert!(p_strong > 0.5);
        assert!(p_weak < 0.5);
        assert!(classifier.summary.held_out_accuracy.is_some());
    }
}
