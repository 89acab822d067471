// Win probability models

use chrono::{DateTime, Utc};
use hoops_models::{FeatureName, FeatureVector, HoopsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::info;

/// Scores a single team's feature vector as a probability of belonging to the
/// winning class. Implementations are read-only once built and are shared
/// across concurrent callers.
pub trait WinProbabilityModel: Send + Sync {
    fn model_name(&self) -> &str;
    fn model_version(&self) -> &str;
    /// Order in which [`win_probability`](Self::win_probability) expects features.
    fn feature_order(&self) -> &[FeatureName];
    fn win_probability(&self, features: &FeatureVector) -> f64;
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Bookkeeping from the training run that produced a classifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingSummary {
    pub examples: usize,
    pub train_size: usize,
    pub held_out_size: usize,
    pub held_out_accuracy: Option<f64>,
    pub held_out_brier: Option<f64>,
    /// Share of examples labelled as winning teams.
    pub positive_rate: f64,
}

/// Fitted logistic regression over standardized team features, together with
/// the feature order it was trained with. This is the persisted artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainedClassifier {
    pub name: String,
    pub version: String,
    pub feature_order: Vec<FeatureName>,
    pub offsets: Vec<f64>,
    pub scales: Vec<f64>,
    pub weights: Vec<f64>,
    pub intercept: f64,
    pub trained_at: DateTime<Utc>,
    pub summary: TrainingSummary,
}

impl TrainedClassifier {
    pub const NAME: &'static str = "LogisticRegression";
    pub const VERSION: &'static str = "v1.0";

    /// Linear score before the logistic link.
    pub fn decision_function(&self, features: &FeatureVector) -> f64 {
        features
            .as_slice()
            .iter()
            .zip(&self.offsets)
            .zip(&self.scales)
            .zip(&self.weights)
            .map(|(((x, offset), scale), w)| w * (x - offset) * scale)
            .sum::<f64>()
            + self.intercept
    }

    /// Checks the artifact is internally consistent.
    pub fn validate(&self) -> Result<()> {
        let n = self.feature_order.len();
        if n == 0 {
            return Err(HoopsError::CorruptArtifact("empty feature order".to_string()));
        }
        let unique: HashSet<_> = self.feature_order.iter().collect();
        if unique.len() != n {
            return Err(HoopsError::CorruptArtifact(
                "feature order lists a feature twice".to_string(),
            ));
        }
        for (label, len) in [
            ("weights", self.weights.len()),
            ("offsets", self.offsets.len()),
            ("scales", self.scales.len()),
        ] {
            if len != n {
                return Err(HoopsError::CorruptArtifact(format!(
                    "{label} has {len} entries for {n} features"
                )));
            }
        }
        Ok(())
    }

    /// Writes the artifact next to `path` and renames it into place, so a
    /// concurrent reader never sees a partial file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        info!("💾 Saved classifier to {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let classifier: Self = serde_json::from_str(&raw)?;
        classifier.validate()?;
        Ok(classifier)
    }
}

impl WinProbabilityModel for TrainedClassifier {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn model_version(&self) -> &str {
        &self.version
    }

    fn feature_order(&self) -> &[FeatureName] {
        &self.feature_order
    }

    fn win_probability(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.decision_function(features))
    }
}

/// Untrained baseline: the logistic of season net rating. Usable before any
/// classifier exists.
#[derive(Debug, Clone)]
pub struct NetRatingModel {
    name: String,
    version: String,
    order: Vec<FeatureName>,
    scale: f64,
}

impl NetRatingModel {
    pub fn new() -> Self {
        Self::with_scale(5.0)
    }

    /// `scale` is the net rating that maps to a ~73% win probability.
    pub fn with_scale(scale: f64) -> Self {
        Self {
            name: "NetRatingBaseline".to_string(),
            version: "v1.0".to_string(),
            order: FeatureName::ALL.to_vec(),
            scale,
        }
    }
}

impl Default for NetRatingModel {
    fn default() -> Self {
        Self::new()
    }
}

impl WinProbabilityModel for NetRatingModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn model_version(&self) -> &str {
        &self.version
    }

    fn feature_order(&self) -> &[FeatureName] {
        &self.order
    }

    fn win_probability(&self, features: &FeatureVector) -> f64 {
        let net_rating = self
            .order
            .iter()
            .position(|name| *name == FeatureName::NetRating)
            .and_then(|i| features.as_slice().get(i).copied())
            .unwrap_or(0.0);
        sigmoid(net_rating / self.scale)
    }
}
