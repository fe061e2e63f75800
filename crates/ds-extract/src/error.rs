//! Extraction errors.

use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Error, Debug, Clone)]
pub enum ExtractError {
    /// The report contains a fatal convergence marker.
    #[error("Simulator diverged: '{marker}' on line {line}")]
    Divergence { marker: String, line: usize },

    /// A required field has no match in the report.
    #[error("Field not found: {field}")]
    FieldNotFound { field: &'static str },

    /// A pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ExtractError::Divergence {
            marker: "iteration exceeded".into(),
            line: 42,
        };
        assert!(err.to_string().contains("iteration exceeded"));
        assert!(err.to_string().contains("42"));

        let err = ExtractError::FieldNotFound {
            field: "specific_volume",
        };
        assert!(err.to_string().contains("specific_volume"));
    }
}
