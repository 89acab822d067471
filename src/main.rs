mod config;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::AppConfig;
use hoops_ml::{ModelTrainer, NetRatingModel};
use hoops_models::{historical_games, season_for, CanonicalFeatureRecord};
use hoops_services::{
    index_by_team, AccuracyEvaluator, PredictorService, RetryingProvider, SnapshotProvider,
    StatsCache, StatsProvider,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "hoops", version, about = "Predict basketball game winners from team statistics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit the classifier on current team stats and save the artifact
    Train {
        #[arg(long)]
        season: Option<String>,
    },
    /// Predict the winner of a single matchup
    Predict {
        home: String,
        away: String,
        /// Use the net-rating baseline instead of the trained classifier
        #[arg(long)]
        baseline: bool,
        #[arg(long)]
        season: Option<String>,
    },
    /// Replay the season's completed games and report accuracy
    Evaluate {
        /// Train a fresh classifier before evaluating
        #[arg(long)]
        retrain: bool,
        #[arg(long)]
        season: Option<String>,
    },
}

struct App {
    config: AppConfig,
    provider: RetryingProvider<SnapshotProvider>,
    cache: StatsCache,
    today: NaiveDate,
}

impl App {
    fn new(config: AppConfig) -> Result<Self> {
        let snapshot = SnapshotProvider::from_path(&config.data.snapshot_path)?;
        let provider = RetryingProvider::new(snapshot, config.retry_policy());
        let cache = StatsCache::new(&config.data.cache_dir);
        Ok(Self {
            config,
            provider,
            cache,
            today: Local::now().date_naive(),
        })
    }

    fn season(&self, requested: Option<String>) -> String {
        requested
            .or_else(|| {
                let season = self.provider.inner().season();
                (!season.is_empty()).then(|| season.to_string())
            })
            .unwrap_or_else(|| season_for(self.today))
    }

    fn records(&self, season: &str) -> Result<Vec<CanonicalFeatureRecord>> {
        let records = self.cache.get_or_collect(&self.provider, season, self.today)?;
        if records.is_empty() {
            bail!("No team stats available for season {season}");
        }
        Ok(records)
    }

    fn train(&self, season: &str) -> Result<PredictorService> {
        let records = self.records(season)?;
        let classifier = ModelTrainer::new(self.config.training()).train(&records)?;
        classifier.save(&self.config.model.artifact_path)?;
        println!("{}", serde_json::to_string_pretty(&classifier.summary)?);
        Ok(PredictorService::with_model(Arc::new(classifier)))
    }

    fn predict(&self, home: &str, away: &str, baseline: bool, season: &str) -> Result<()> {
        let stats = index_by_team(self.records(season)?);
        let predictor = if baseline {
            PredictorService::with_model(Arc::new(NetRatingModel::new()))
        } else {
            PredictorService::load_artifact(&self.config.model.artifact_path)?
        };

        match predictor.predict_winner(home, away, &stats) {
            Ok(prediction) => println!("{}", serde_json::to_string_pretty(&prediction)?),
            Err(reason) => {
                warn!("⚠️  No prediction for {} vs {}: {}", home, away, reason);
                let body = json!({ "home": home, "away": away, "prediction": null, "reason": reason.to_string() });
                println!("{}", serde_json::to_string_pretty(&body)?);
            }
        }
        Ok(())
    }

    fn evaluate(&self, retrain: bool, season: &str) -> Result<()> {
        let predictor = if retrain {
            self.train(season)?
        } else {
            PredictorService::load_artifact(&self.config.model.artifact_path)?
        };
        let stats = index_by_team(self.records(season)?);
        let games = historical_games(&self.provider.game_log(season).unwrap_or_default());
        info!("🏀 Evaluating {} completed games for {}", games.len(), season);

        let report = AccuracyEvaluator::new(&predictor).evaluate(&games, &stats);
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hoops=info,hoops_ml=info,hoops_services=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::new()?;
    info!("✅ Configuration loaded successfully");
    info!("📊 Snapshot: {}", config.data.snapshot_path.display());
    info!("🧠 Model artifact: {}", config.model.artifact_path.display());

    let app = App::new(config)?;
    match cli.command {
        Command::Train { season } => {
            let season = app.season(season);
            info!("🚀 Training model for {}", season);
            app.train(&season)?;
        }
        Command::Predict {
            home,
            away,
            baseline,
            season,
        } => {
            let season = app.season(season);
            app.predict(&home, &away, baseline, &season)?;
        }
        Command::Evaluate { retrain, season } => {
            let season = app.season(season);
            app.evaluate(retrain, &season)?;
        }
    }
    Ok(())
}
