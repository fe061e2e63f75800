//! Configuration validation logic.

use crate::schema::{LATEST_VERSION, SweepConfig};
use ds_mixture::MixtureError;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown mixture: {name}")]
    UnknownMixture { name: String },

    #[error("Unknown chemistry: {name}")]
    UnknownChemistry { name: String },

    #[error("Mixture error: {0}")]
    Mixture(#[from] MixtureError),

    #[error("Duplicate concentration: {value}")]
    DuplicateConcentration { value: f64 },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_config(config: &SweepConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    let simulator = &config.simulator;
    if simulator.executable.trim().is_empty() {
        return Err(invalid("simulator.executable", "", "must not be empty"));
    }
    if !(simulator.timeout_s.is_finite() && simulator.timeout_s > 0.0) {
        return Err(invalid(
            "simulator.timeout_s",
            simulator.timeout_s,
            "must be positive",
        ));
    }
    if simulator.input_file() == simulator.output_file() {
        return Err(invalid(
            "simulator.output_path",
            simulator.output_path.display(),
            "must differ from input_path",
        ));
    }

    config.base.resolve()?;
    config.variable.resolve()?;
    let chemistry = config.chemistry.resolve()?;
    if let ds_deck::Chemistry::Custom(custom) = &chemistry {
        if custom.formations.is_empty() {
            return Err(invalid(
                "chemistry.formations",
                &custom.name,
                "custom chemistry needs at least one formation",
            ));
        }
    }

    for (i, segment) in config.concentrations.segments.iter().enumerate() {
        if segment.point_count().is_none() {
            return Err(invalid(
                &format!("concentrations.segments[{}]", i),
                segment,
                "needs finite bounds, start <= end and a positive step",
            ));
        }
    }

    let points = config.concentrations.generate_points();
    if points.is_empty() {
        return Err(invalid("concentrations", "[]", "sweep has no points"));
    }
    let mut seen = HashSet::new();
    for value in points {
        if !(value > 0.0 && value < 1.0) {
            return Err(invalid("concentrations", value, "must lie in (0, 1)"));
        }
        if !seen.insert(value.to_bits()) {
            return Err(ValidationError::DuplicateConcentration { value });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{ConcentrationPlan, Segment};
    use crate::schema::{ChemistryDef, MixtureDef};

    #[test]
    fn reference_config_is_valid() {
        let config = SweepConfig::reference();
        validate_config(&config).unwrap();
        assert_eq!(config.concentrations.generate_points().len(), 51);
    }

    #[test]
    fn rejects_out_of_range_points() {
        let mut config = SweepConfig::reference();
        config.concentrations = ConcentrationPlan::from_points(vec![0.5, 1.0]);
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_duplicate_points() {
        let mut config = SweepConfig::reference();
        config.concentrations.points = vec![0.2];
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::DuplicateConcentration { .. })
        ));
    }

    #[test]
    fn rejects_vanishing_step() {
        let mut config = SweepConfig::reference();
        config.concentrations.segments = vec![Segment {
            start: 0.01,
            end: 0.9,
            step: 1e-300,
        }];
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn rejects_bad_segment_and_empty_plan() {
        let mut config = SweepConfig::reference();
        config.concentrations.segments = vec![Segment {
            start: 0.2,
            end: 0.1,
            step: 0.01,
        }];
        assert!(validate_config(&config).is_err());

        config.concentrations = ConcentrationPlan::default();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn rejects_unknown_names() {
        let mut config = SweepConfig::reference();
        config.variable = MixtureDef::standard("propane");
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnknownMixture { .. })
        ));

        let mut config = SweepConfig::reference();
        config.chemistry = ChemistryDef::builtin("propane");
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnknownChemistry { .. })
        ));
    }

    #[test]
    fn rejects_bad_inline_mixture() {
        let mut config = SweepConfig::reference();
        config.base = MixtureDef::Inline {
            name: "bad".to_string(),
            parts: vec![("o2".to_string(), -1.0)],
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::Mixture(_))
        ));
    }

    #[test]
    fn rejects_bad_simulator_settings() {
        let mut config = SweepConfig::reference();
        config.simulator.timeout_s = 0.0;
        assert!(validate_config(&config).is_err());

        let mut config = SweepConfig::reference();
        config.simulator.output_path = config.simulator.input_path.clone();
        assert!(validate_config(&config).is_err());

        let mut config = SweepConfig::reference();
        config.simulator.executable = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }
}
