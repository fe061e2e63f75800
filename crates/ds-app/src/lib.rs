//! Shared application service layer for detsweep.
//!
//! Drives the external simulator through the two-pass protocol for every
//! concentration point, collects the records and hands them to the report
//! store. The CLI is a thin shell over [`run_sweep`].

pub mod controller;
pub mod driver;
pub mod error;
pub mod progress;
pub mod sweep_service;

pub use controller::{PointOutcome, SweepController, SweepSummary, SweepTiming};
pub use driver::{DriverError, DriverResult, ProcessDriver, SimulatorDriver};
pub use error::{AppError, AppResult, SweepError};
pub use progress::{PointStage, SweepProgressEvent};
pub use sweep_service::{
    SweepResponse, build_manifest, compile_point_deck, load_config, run_sweep,
    run_sweep_with_progress,
};
