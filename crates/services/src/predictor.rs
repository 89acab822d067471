// Prediction service

use hoops_ml::{FeatureVectorBuilder, TrainedClassifier, WinProbabilityModel};
use hoops_models::{
    normalize_team_name, CanonicalFeatureRecord, HeadToHead, HoopsError, ModelInput,
    NoPrediction, PredictionResult, Result, StatsByTeam,
};
use parking_lot::RwLock;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Predicts matchup winners from the currently installed model.
///
/// The model slot starts empty; until a model is installed every prediction
/// reports [`NoPrediction::ModelUnavailable`]. Installing a model replaces the
/// slot in one step, so in-flight predictions finish on the model they started
/// with.
pub struct PredictorService {
    model: RwLock<Option<Arc<dyn WinProbabilityModel>>>,
}

impl PredictorService {
    pub fn new() -> Self {
        Self {
            model: RwLock::new(None),
        }
    }

    pub fn with_model(model: Arc<dyn WinProbabilityModel>) -> Self {
        Self {
            model: RwLock::new(Some(model)),
        }
    }

    /// Loads a persisted classifier. A missing artifact is a normal startup
    /// state and yields an unloaded service; a corrupt one is an error.
    pub fn load_artifact(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match TrainedClassifier::load(path) {
            Ok(classifier) => {
                info!(
                    "✅ Loaded {} {} from {}",
                    classifier.name,
                    classifier.version,
                    path.display()
                );
                Ok(Self::with_model(Arc::new(classifier)))
            }
            Err(HoopsError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                warn!("⚠️  Model file {} not found. Train the model first.", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(e),
        }
    }

    pub fn install(&self, model: Arc<dyn WinProbabilityModel>) {
        info!("🔄 Installing model {} {}", model.model_name(), model.model_version());
        *self.model.write() = Some(model);
    }

    pub fn unload(&self) {
        *self.model.write() = None;
    }

    pub fn is_ready(&self) -> bool {
        self.model.read().is_some()
    }

    pub fn current_model(&self) -> Option<Arc<dyn WinProbabilityModel>> {
        self.model.read().clone()
    }

    /// Predicts the winner of `home` vs `away` from `stats`.
    pub fn predict_winner(
        &self,
        home: &str,
        away: &str,
        stats: &StatsByTeam,
    ) -> std::result::Result<PredictionResult, NoPrediction> {
        let Some(model) = self.current_model() else {
            debug!("❌ No model loaded, cannot predict {} vs {}", home, away);
            return Err(NoPrediction::ModelUnavailable);
        };

        let home_team = normalize_team_name(home);
        let away_team = normalize_team_name(away);
        debug!("🔍 Normalized names: home={}, away={}", home_team, away_team);

        let home_record = lookup(stats, &home_team)?;
        let away_record = lookup(stats, &away_team)?;

        let order = model.feature_order();
        let home_features = FeatureVectorBuilder::build(home_record, order).inspect_err(|e| {
            info!("⚠️  Skipping {} vs {}: {}", home_team, away_team, e);
        })?;
        let away_features = FeatureVectorBuilder::build(away_record, order).inspect_err(|e| {
            info!("⚠️  Skipping {} vs {}: {}", home_team, away_team, e);
        })?;

        let home_raw = model.win_probability(&home_features);
        let away_raw = model.win_probability(&away_features);
        let split = HeadToHead::from_raw(home_raw, away_raw);

        let result = PredictionResult::new(
            model.model_name().to_string(),
            model.model_version().to_string(),
            home_team,
            away_team,
            split,
            ModelInput {
                home: home_features,
                away: away_features,
            },
        );
        debug!(
            "✅ Predicted winner: {} ({}: {:.2}%, {}: {:.2}%)",
            result.winner,
            result.home_team,
            result.home_win_prob,
            result.away_team,
            result.away_win_prob
        );
        Ok(result)
    }

    /// Same as [`predict_winner`](Self::predict_winner), discarding the reason.
    pub fn predict(&self, home: &str, away: &str, stats: &StatsByTeam) -> Option<PredictionResult> {
        self.predict_winner(home, away, stats).ok()
    }
}

impl Default for PredictorService {
    fn default() -> Self {
        Self::new()
    }
}

fn lookup<'a>(
    stats: &'a StatsByTeam,
    team: &str,
) -> std::result::Result<&'a CanonicalFeatureRecord, NoPrediction> {
    stats.get(team).ok_or_else(|| {
        debug!("🚫 Missing stats for {}", team);
        NoPrediction::MissingTeam {
            team: team.to_string(),
        }
    })
}
