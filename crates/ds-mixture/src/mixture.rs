//! Named mixtures.

use crate::error::{MixtureError, MixtureResult};
use serde::Serialize;

/// Immutable named composition of species by mole fraction.
///
/// Fractions are kept exactly as given: they are not normalized, and the
/// insertion order of species is preserved so the compiled deck is
/// reproducible. Each mixture owns its own species list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mixture {
    name: String,
    parts: Vec<(String, f64)>,
}

impl Mixture {
    /// Create a mixture from `(species, mole fraction)` pairs.
    ///
    /// Validates that the list is non-empty, species identifiers are unique and
    /// non-blank, and fractions are finite and non-negative.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        parts: impl IntoIterator<Item = (S, f64)>,
    ) -> MixtureResult<Self> {
        let name = name.into();
        let mut owned: Vec<(String, f64)> = Vec::new();

        for (species, fraction) in parts {
            let species = species.into().trim().to_string();
            if species.is_empty() {
                return Err(MixtureError::EmptySpecies { name });
            }
            if !fraction.is_finite() || fraction < 0.0 {
                return Err(MixtureError::InvalidFraction {
                    name,
                    species,
                    value: fraction,
                });
            }
            if owned.iter().any(|(s, _)| *s == species) {
                return Err(MixtureError::DuplicateSpecies { name, species });
            }
            owned.push((species, fraction));
        }

        if owned.is_empty() {
            return Err(MixtureError::Empty { name });
        }

        Ok(Self { name, parts: owned })
    }

    /// Single-species mixture.
    pub fn pure(name: impl Into<String>, species: impl Into<String>) -> MixtureResult<Self> {
        Self::new(name, [(species.into(), 1.0)])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Species and fractions in declaration order.
    pub fn parts(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.parts.iter().map(|(s, f)| (s.as_str(), *f))
    }

    /// Mole fraction of a species (0.0 if not present).
    pub fn fraction(&self, species: &str) -> f64 {
        self.parts
            .iter()
            .find(|(s, _)| s == species)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    /// Sum of all fractions. Not required to be 1.
    pub fn total_fraction(&self) -> f64 {
        self.parts.iter().map(|(_, f)| f).sum()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Dry air, 21% oxygen and 79% nitrogen.
    pub fn air() -> Self {
        Self::builtin("air", &[("o2", 0.21), ("n2", 0.79)])
    }

    pub fn methane() -> Self {
        Self::builtin("methane", &[("ch4", 1.0)])
    }

    pub fn acetylene() -> Self {
        Self::builtin("acetylene", &[("c2h2", 1.0)])
    }

    pub fn ethane() -> Self {
        Self::builtin("ethane", &[("c2h6", 1.0)])
    }

    /// Names accepted by [`Mixture::standard`].
    pub const STANDARD_NAMES: [&'static str; 4] = ["air", "methane", "acetylene", "ethane"];

    /// Look up a standard mixture by name (case-insensitive).
    pub fn standard(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "air" => Some(Self::air()),
            "methane" | "ch4" => Some(Self::methane()),
            "acetylene" | "c2h2" => Some(Self::acetylene()),
            "ethane" | "c2h6" => Some(Self::ethane()),
            _ => None,
        }
    }

    fn builtin(name: &str, parts: &[(&str, f64)]) -> Self {
        Self {
            name: name.to_string(),
            parts: parts.iter().map(|(s, f)| (s.to_string(), *f)).collect(),
        }
    }
}
