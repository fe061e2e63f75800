//! Concentration sweep plans.
//!
//! A plan is a list of evenly stepped segments followed by explicit points.
//! Spacing does not have to be uniform across the sweep; the reference sweep
//! uses fine steps at low concentration and coarse steps above.

use ds_core::numeric::round_to;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimals kept on generated points.
const POINT_DECIMALS: u32 = 6;

/// Upper bound on points per segment.
pub const MAX_SEGMENT_POINTS: usize = 10_000;

/// Inclusive range `start..=end` stepped by `step`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Segment {
    /// Number of points, or `None` if the segment is malformed.
    pub fn point_count(&self) -> Option<usize> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return None;
        }
        if self.step <= 0.0 || self.end < self.start {
            return None;
        }
        let intervals = ((self.end - self.start) / self.step + 1e-9).floor();
        // Checked in floating point so a tiny step cannot saturate the cast.
        if !(intervals < MAX_SEGMENT_POINTS as f64) {
            return None;
        }
        Some(intervals as usize + 1)
    }

    /// Points generated by integer stepping, so rounding error does not
    /// accumulate along the segment.
    pub fn generate_points(&self) -> Vec<f64> {
        let Some(count) = self.point_count() else {
            return Vec::new();
        };
        (0..count)
            .map(|i| round_to(self.start + i as f64 * self.step, POINT_DECIMALS))
            .collect()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {} step {}", self.start, self.end, self.step)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ConcentrationPlan {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<f64>,
}

impl ConcentrationPlan {
    pub fn from_points(points: Vec<f64>) -> Self {
        Self {
            segments: Vec::new(),
            points,
        }
    }

    /// Segments in order, then explicit points.
    pub fn generate_points(&self) -> Vec<f64> {
        self.segments
            .iter()
            .flat_map(Segment::generate_points)
            .chain(self.points.iter().copied())
            .collect()
    }
}
