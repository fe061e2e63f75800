//! Deck compilation errors.

use ds_mixture::MixtureError;
use std::path::PathBuf;
use thiserror::Error;

pub type DeckResult<T> = Result<T, DeckError>;

#[derive(Error, Debug)]
pub enum DeckError {
    /// Second-pass density is the failure sentinel or otherwise unusable.
    #[error("Density invalid: {value}")]
    DensityInvalid { value: f64 },

    #[error("Mixture error: {0}")]
    Mixture(#[from] MixtureError),

    /// The directory holding the input deck does not exist.
    #[error("Deck directory missing for {path}")]
    MissingDirectory { path: PathBuf },

    #[error("Failed to write deck: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DeckError::DensityInvalid { value: -1.0 };
        assert!(err.to_string().contains("-1"));

        let err = DeckError::MissingDirectory {
            path: PathBuf::from("/nope/INPUT"),
        };
        assert!(err.to_string().contains("INPUT"));
    }
}
