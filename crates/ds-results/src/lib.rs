//! ds-results: sweep result aggregation and report files.

pub mod csv;
pub mod hash;
pub mod store;
pub mod summary;
pub mod types;

pub use hash::compute_sweep_id;
pub use store::{ReportStore, SavedReport, load_manifest, load_report};
pub use summary::{PEAK_FIELDS, Peak, peak, peaks};
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error on line {line}: {message}")]
    Csv { line: usize, message: String },

    #[error("Duplicate concentration: {concentration}")]
    DuplicateConcentration { concentration: f64 },

    #[error("Unknown report format: {path}")]
    UnknownFormat { path: String },
}
