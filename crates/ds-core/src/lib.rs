//! ds-core: shared foundation for detsweep.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - units (uom SI types + constructors for the simulator's report units)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
