//! Mixture errors.

use ds_core::CoreError;
use thiserror::Error;

/// Result type for mixture operations.
pub type MixtureResult<T> = Result<T, MixtureError>;

/// Errors that can occur while defining or blending mixtures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MixtureError {
    /// A mixture with no species.
    #[error("Mixture '{name}' has no species")]
    Empty { name: String },

    /// Negative or non-finite mole fraction.
    #[error("Invalid mole fraction for {species} in '{name}': {value}")]
    InvalidFraction {
        name: String,
        species: String,
        value: f64,
    },

    /// Same species listed twice in one mixture.
    #[error("Duplicate species {species} in '{name}'")]
    DuplicateSpecies { name: String, species: String },

    /// Blank species identifier.
    #[error("Empty species identifier in '{name}'")]
    EmptySpecies { name: String },

    /// Concentration outside (0, 1).
    #[error("Concentration must lie in (0, 1), got {value}")]
    InvalidConcentration { value: f64 },
}

impl From<CoreError> for MixtureError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { value, .. } | CoreError::OutOfRange { value, .. } => {
                MixtureError::InvalidConcentration { value }
            }
        }
    }
}
