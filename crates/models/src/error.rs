use thiserror::Error;

use crate::stats::FeatureName;

/// A team record is missing one or more model features.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Incomplete stats for {team}: missing {}", format_missing(.missing))]
pub struct IncompleteData {
    pub team: String,
    pub missing: Vec<FeatureName>,
}

fn format_missing(missing: &[FeatureName]) -> String {
    missing
        .iter()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a matchup produced no prediction. None of these are faults: callers
/// branch on the reason instead of parsing log output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoPrediction {
    #[error("Team not found in stats: {team}")]
    MissingTeam { team: String },

    #[error(transparent)]
    IncompleteData(#[from] IncompleteData),

    #[error("No win probability model loaded")]
    ModelUnavailable,
}

#[derive(Error, Debug)]
pub enum HoopsError {
    #[error("Insufficient training data: {found} complete examples, need at least {required}")]
    InsufficientData { found: usize, required: usize },

    #[error("Training labels contain a single class; cannot fit a binary classifier")]
    DegenerateLabels,

    #[error("Model training failed: {0}")]
    Training(String),

    #[error("Corrupt model artifact: {0}")]
    CorruptArtifact(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HoopsError>;
