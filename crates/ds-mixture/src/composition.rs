//! Blending a base mixture with a variable mixture.

use crate::error::MixtureResult;
use crate::mixture::Mixture;
use ds_core::numeric::ensure_open_unit;
use std::fmt;

/// Total mole basis of every compiled deck.
///
/// Only the ratios reach the simulator, so the scale has no effect on
/// intensive results; 10 moles keeps the `com,` line readable.
pub const TOTAL_MOLES: f64 = 10.0;

/// Combined mole amounts keyed by species, in first-occurrence order
/// (base species first, then species only present in the variable mixture).
#[derive(Debug, Clone, PartialEq)]
pub struct MoleTable {
    entries: Vec<(String, f64)>,
}

impl MoleTable {
    /// Blend `variable` into `base` at the given molar `concentration`.
    ///
    /// `variable_moles = concentration * TOTAL_MOLES`, the base fills the rest.
    /// A species present in both mixtures receives the sum of both
    /// contributions.
    pub fn compose(base: &Mixture, variable: &Mixture, concentration: f64) -> MixtureResult<Self> {
        let concentration = ensure_open_unit(concentration, "concentration")?;
        let variable_moles = concentration * TOTAL_MOLES;
        let base_moles = TOTAL_MOLES - variable_moles;

        let mut table = Self {
            entries: Vec::with_capacity(base.len() + variable.len()),
        };
        for (species, fraction) in base.parts() {
            table.accumulate(species, base_moles * fraction);
        }
        for (species, fraction) in variable.parts() {
            table.accumulate(species, variable_moles * fraction);
        }
        Ok(table)
    }

    fn accumulate(&mut self, species: &str, moles: f64) {
        match self.entries.iter_mut().find(|(s, _)| s == species) {
            Some((_, total)) => *total += moles,
            None => self.entries.push((species.to_string(), moles)),
        }
    }

    /// Moles of a species (0.0 if not present).
    pub fn moles(&self, species: &str) -> f64 {
        self.entries
            .iter()
            .find(|(s, _)| s == species)
            .map(|(_, m)| *m)
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(s, m)| (s.as_str(), *m))
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, m)| m).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as `com,<species>,<moles>,...,mole` with three decimals.
    pub fn com_directive(&self) -> String {
        let mut line = String::from("com,");
        for (species, moles) in &self.entries {
            line.push_str(species);
            line.push(',');
            line.push_str(&format!("{:.3}", moles));
            line.push(',');
        }
        line.push_str("mole");
        line
    }
}

impl fmt::Display for MoleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.com_directive())
    }
}
