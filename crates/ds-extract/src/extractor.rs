//! Report scraping.

use crate::error::{ExtractError, ExtractResult};
use crate::record::{DetonationRecord, RecordField};
use ds_mixture::{Phase, ProductSpecies};
use regex::Regex;

/// Substrings that mark a fatal solver failure anywhere in a report.
pub const DIVERGENCE_MARKERS: [&str; 1] = ["iteration exceeded"];

/// Scientific notation as printed by the simulator, e.g. `1.234E-02`.
const SCI: &str = r"-?\d+\.\d+[Ee][+-]\d+";
/// Plain or scientific real.
const REAL: &str = r"-?\d+(?:\.\d*)?(?:[Ee][+-]?\d+)?";
/// Unsigned yield column.
const YIELD: &str = r"\d*\.?\d+(?:[Ee][+-]?\d+)?";

/// Compiled patterns for every field read from a report.
#[derive(Debug, Clone)]
pub struct OutputExtractor {
    markers: Vec<String>,
    standard_volume: Regex,
    shock_velocity: Regex,
    labelled_row: Regex,
    bare_row: Regex,
    gas_yields: Vec<(ProductSpecies, Regex)>,
    total_gas: Regex,
    solid_carbon: Regex,
}

impl OutputExtractor {
    pub fn new() -> ExtractResult<Self> {
        Self::with_markers(DIVERGENCE_MARKERS.iter().map(|m| m.to_string()).collect())
    }

    /// Extractor with a custom list of divergence markers.
    pub fn with_markers(markers: Vec<String>) -> ExtractResult<Self> {
        let gas_yields = ProductSpecies::ALL
            .iter()
            .filter(|s| s.phase() == Phase::Gas)
            .map(|s| {
                let pattern = format!(r"\b{}\b\s+gas\s+({})", regex::escape(s.key()), YIELD);
                Regex::new(&pattern).map(|re| (*s, re))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            markers,
            standard_volume: Regex::new(r"standard volume is\s+(-?\d+\.\d+)")?,
            shock_velocity: Regex::new(&format!(r"shock velocity is\s+({})", SCI))?,
            labelled_row: Regex::new(&format!(
                r"1\.\)[ \t]+({SCI})[ \t]+({SCI})[ \t]+(\S+)[ \t]+(\S+)"
            ))?,
            bare_row: Regex::new(&format!(
                r"(?m)^[ \t]*({SCI})[ \t]+({SCI})[ \t]+({REAL})[ \t]+({REAL})[ \t\r]*$"
            ))?,
            gas_yields,
            total_gas: Regex::new(&format!(r"\btotal\b\s+gas\s+({})", YIELD))?,
            solid_carbon: Regex::new(&format!(r"\*c\s+soli\s+({})", YIELD))?,
        })
    }

    /// First divergence marker found, scanning line by line.
    pub fn scan_divergence(&self, text: &str) -> Option<ExtractError> {
        for (number, line) in text.lines().enumerate() {
            if let Some(marker) = self.markers.iter().find(|m| line.contains(m.as_str())) {
                return Some(ExtractError::Divergence {
                    marker: marker.clone(),
                    line: number + 1,
                });
            }
        }
        None
    }

    /// Specific volume [cc/g] from a density-pass report.
    pub fn extract_density(&self, text: &str) -> ExtractResult<f64> {
        if let Some(err) = self.scan_divergence(text) {
            return Err(err);
        }

        match capture_f64(&self.standard_volume, text) {
            Some(volume) => {
                tracing::debug!(specific_volume = volume, "standard volume matched");
                Ok(volume)
            }
            None => {
                tracing::warn!(field = "specific_volume", "no match");
                Err(ExtractError::FieldNotFound {
                    field: "specific_volume",
                })
            }
        }
    }

    /// Full record from a final-pass report.
    ///
    /// Only divergence is an error; every unmatched field is defaulted and
    /// listed in [`DetonationRecord::missing`].
    pub fn extract(&self, text: &str) -> ExtractResult<DetonationRecord> {
        if let Some(err) = self.scan_divergence(text) {
            return Err(err);
        }

        let mut record = DetonationRecord::default();

        let velocity = capture_f64(&self.shock_velocity, text);
        self.store(&mut record, RecordField::Velocity, velocity);

        let (pressure, temperature, enthalpy) = self.primary_row(text);
        self.store(&mut record, RecordField::Pressure, pressure);
        self.store(&mut record, RecordField::Temperature, temperature);
        self.store(&mut record, RecordField::Enthalpy, enthalpy);

        for (species, pattern) in &self.gas_yields {
            let value = capture_f64(pattern, text);
            self.store(&mut record, RecordField::Product(*species), value);
        }

        let total = capture_f64(&self.total_gas, text);
        self.store(&mut record, RecordField::TotalGas, total);

        let carbon = capture_f64(&self.solid_carbon, text);
        self.store(&mut record, RecordField::Product(ProductSpecies::C), carbon);

        Ok(record)
    }

    /// Pressure, temperature and enthalpy columns of the C-J results row.
    fn primary_row(&self, text: &str) -> (Option<f64>, Option<f64>, Option<f64>) {
        let caps = self
            .labelled_row
            .captures(text)
            .or_else(|| self.bare_row.captures(text));

        match caps {
            Some(caps) => {
                let column = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<f64>().ok());
                (column(1), column(3), column(4))
            }
            None => (None, None, None),
        }
    }

    fn store(&self, record: &mut DetonationRecord, field: RecordField, value: Option<f64>) {
        match value {
            Some(v) => tracing::trace!(%field, value = v, "matched"),
            None => {
                match field {
                    RecordField::Product(_) | RecordField::TotalGas => {
                        tracing::debug!(%field, "no match, defaulting to 0")
                    }
                    _ => tracing::warn!(%field, "no match"),
                }
                record.missing.push(field);
            }
        }
        field.set(record, value);
    }
}

fn capture_f64(pattern: &Regex, text: &str) -> Option<f64> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
