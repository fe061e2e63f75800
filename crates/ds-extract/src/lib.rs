//! ds-extract: structured results scraped from the simulator's text report.
//!
//! The simulator has no structured output, so every value is found by a
//! regular expression. All patterns live in [`OutputExtractor`]; the rest of
//! the workspace only sees [`DetonationRecord`] and [`ExtractError`].
//!
//! Absent fields are not errors. Only a divergence marker aborts extraction,
//! and a missing standard volume aborts the density pass.

pub mod error;
pub mod extractor;
pub mod record;

pub use error::{ExtractError, ExtractResult};
pub use extractor::{DIVERGENCE_MARKERS, OutputExtractor};
pub use record::{DetonationRecord, RecordField};
