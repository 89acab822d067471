use config::{Config, ConfigError, Environment, File};
use hoops_ml::TrainingConfig;
use hoops_models::HoopsError;
use hoops_services::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub data: DataConfig,
    pub model: ModelConfig,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub snapshot_path: PathBuf,
    pub cache_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub artifact_path: PathBuf,
    pub seed: u64,
    pub held_out_ratio: f64,
    pub min_examples: usize,
    pub alpha: f64,
    pub max_iterations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub jitter: bool,
}

impl AppConfig {
    pub fn new() -> Result<Self, HoopsError> {
        let config = Self::build().map_err(|e| HoopsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn build() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let training = TrainingConfig::default();

        let config = Config::builder()
            // Start with default values
            .set_default("data.snapshot_path", "data/snapshot.json")?
            .set_default("data.cache_dir", "data/cache")?
            .set_default("model.artifact_path", "models/nba_model.json")?
            .set_default("model.seed", training.seed)?
            .set_default("model.held_out_ratio", training.held_out_ratio)?
            .set_default("model.min_examples", training.min_examples as u64)?
            .set_default("model.alpha", training.alpha)?
            .set_default("model.max_iterations", training.max_iterations)?
            .set_default("provider.max_attempts", 3)?
            .set_default("provider.retry_delay_ms", 2000)?
            .set_default("provider.jitter", true)?
            // Add in settings from configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // HOOPS__MODEL__ARTIFACT_PATH and friends
            .add_source(Environment::with_prefix("HOOPS").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    fn validate(&self) -> Result<(), HoopsError> {
        if !(0.0..1.0).contains(&self.model.held_out_ratio) {
            return Err(HoopsError::Config(format!(
                "model.held_out_ratio must be in [0, 1), got {}",
                self.model.held_out_ratio
            )));
        }
        if self.model.min_examples < 2 {
            return Err(HoopsError::Config(
                "model.min_examples must be at least 2".to_string(),
            ));
        }
        Ok(())
    }

    pub fn training(&self) -> TrainingConfig {
        TrainingConfig {
            seed: self.model.seed,
            held_out_ratio: self.model.held_out_ratio,
            min_examples: self.model.min_examples,
            alpha: self.model.alpha,
            max_iterations: self.model.max_iterations,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.provider.max_attempts.max(1),
            delay: Duration::from_millis(self.provider.retry_delay_ms),
            jitter: self.provider.jitter,
        }
    }
}
