//! Peak values across a sweep.

use crate::types::ResultSet;
use ds_extract::RecordField;

/// Maximum of one column and the concentration it occurs at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub field: RecordField,
    pub concentration: f64,
    pub value: f64,
    /// The peak value in SI base units, with its unit symbol.
    pub si: Option<(f64, &'static str)>,
}

/// Columns worth a peak summary.
pub const PEAK_FIELDS: [RecordField; 4] = [
    RecordField::Velocity,
    RecordField::Pressure,
    RecordField::Temperature,
    RecordField::Enthalpy,
];

/// Peak of a column; absent values are skipped, ties keep the earliest point.
pub fn peak(results: &ResultSet, field: RecordField) -> Option<Peak> {
    results
        .iter()
        .filter_map(|(c, r)| field.get(r).map(|v| (c, r, v)))
        .filter(|(_, _, v)| v.is_finite())
        .fold(None, |best: Option<Peak>, (concentration, record, value)| match best {
            Some(b) if b.value >= value => Some(b),
            _ => Some(Peak {
                field,
                concentration,
                value,
                si: field.si_value(record),
            }),
        })
}

pub fn peaks(results: &ResultSet) -> Vec<Peak> {
    PEAK_FIELDS
        .iter()
        .filter_map(|f| peak(results, *f))
        .collect()
}
