//! Error types for the ds-app service layer.

use crate::driver::DriverError;
use ds_deck::DeckError;
use ds_extract::ExtractError;
use ds_mixture::MixtureError;
use std::path::PathBuf;

/// Why a single concentration point was aborted.
///
/// None of these stop the sweep; the controller logs them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    #[error("Deck directory missing: {path}")]
    MissingDirectory { path: PathBuf },

    #[error("Failed to write deck {path}: {source}")]
    DeckWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Density invalid: {value}")]
    DensityInvalid { value: f64 },

    #[error("Mixture error: {0}")]
    Mixture(#[from] MixtureError),

    #[error("Simulator diverged: '{marker}' on line {line}")]
    SimulatorDivergence { marker: String, line: usize },

    #[error("Field not found: {field}")]
    FieldNotFound { field: &'static str },

    #[error("Simulator failed: {0}")]
    Simulator(#[from] DriverError),

    #[error("Failed to read report {path}: {source}")]
    OutputRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Extractor error: {message}")]
    Extractor { message: String },

    #[error("Result rejected: {message}")]
    Rejected { message: String },
}

impl From<DeckError> for SweepError {
    fn from(err: DeckError) -> Self {
        match err {
            DeckError::DensityInvalid { value } => SweepError::DensityInvalid { value },
            DeckError::Mixture(e) => SweepError::Mixture(e),
            DeckError::MissingDirectory { path } => SweepError::MissingDirectory { path },
            DeckError::Write { path, source } => SweepError::DeckWrite { path, source },
        }
    }
}

impl From<ExtractError> for SweepError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::Divergence { marker, line } => {
                SweepError::SimulatorDivergence { marker, line }
            }
            ExtractError::FieldNotFound { field } => SweepError::FieldNotFound { field },
            ExtractError::Pattern(e) => SweepError::Extractor {
                message: e.to_string(),
            },
        }
    }
}

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Deck error: {0}")]
    Deck(String),

    #[error("Extraction error: {0}")]
    Extract(String),

    #[error("Results error: {0}")]
    Results(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ds-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<ds_config::ConfigError> for AppError {
    fn from(err: ds_config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<ds_config::ValidationError> for AppError {
    fn from(err: ds_config::ValidationError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<DeckError> for AppError {
    fn from(err: DeckError) -> Self {
        AppError::Deck(err.to_string())
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        AppError::Extract(err.to_string())
    }
}

impl From<ds_results::ResultsError> for AppError {
    fn from(err: ds_results::ResultsError) -> Self {
        AppError::Results(err.to_string())
    }
}
