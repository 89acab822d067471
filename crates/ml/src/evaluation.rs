// Held-out evaluation of a fitted model

use hoops_models::FeatureVector;

use crate::models::WinProbabilityModel;

/// Classification quality of a model over labelled vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldoutMetrics {
    pub accuracy: f64,
    pub brier_score: f64,
}

/// Scores `model` on labelled examples at a 0.5 decision threshold.
/// Returns `None` for an empty set.
pub fn holdout_metrics<M>(model: &M, examples: &[(FeatureVector, bool)]) -> Option<HoldoutMetrics>
where
    M: WinProbabilityModel + ?Sized,
{
    if examples.is_empty() {
        return None;
    }

    let mut correct = 0usize;
    let mut brier = 0.0;
    for (features, label) in examples {
        let prob = model.win_probability(features);
        if (prob >= 0.5) == *label {
            correct += 1;
        }
        let outcome = if *label { 1.0 } else { 0.0 };
        brier += (prob - outcome).powi(2);
    }

    let n = examples.len() as f64;
    Some(HoldoutMetrics {
        accuracy: correct as f64 / n,
        brier_score: brier / n,
    })
}
