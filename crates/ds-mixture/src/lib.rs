//! ds-mixture: mixture definitions and mole bookkeeping for detsweep.
//!
//! Provides:
//! - `Mixture`: an immutable named composition of species by mole fraction
//! - standard mixtures (air, methane, acetylene, ethane)
//! - `MoleTable`: a base mixture blended with a variable mixture at a given
//!   concentration, rendered as the simulator's `com,` directive
//! - `ProductSpecies`: the fixed set of reaction products read back from reports
//!
//! # Example
//!
//! ```
//! use ds_mixture::{Mixture, MoleTable};
//!
//! let table = MoleTable::compose(&Mixture::air(), &Mixture::methane(), 0.1).unwrap();
//! assert_eq!(table.com_directive(), "com,o2,1.890,n2,7.110,ch4,1.000,mole");
//! ```

pub mod composition;
pub mod error;
pub mod mixture;
pub mod species;

pub use composition::{MoleTable, TOTAL_MOLES};
pub use error::{MixtureError, MixtureResult};
pub use mixture::Mixture;
pub use species::{Phase, ProductSpecies};
