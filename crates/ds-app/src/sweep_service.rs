//! Sweep execution and report service.

use std::path::Path;

use chrono::{DateTime, Local};
use ds_config::{SweepConfig, validate_config};
use ds_deck::{InputDeck, compile_deck};
use ds_results::{ReportStore, SavedReport, SweepManifest, compute_sweep_id};

use crate::controller::{SweepController, SweepSummary};
use crate::driver::{ProcessDriver, SimulatorDriver};
use crate::error::{AppError, AppResult};
use crate::progress::SweepProgressEvent;

/// Tool version folded into the sweep ID.
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Response from a finished sweep.
#[derive(Debug, Clone)]
pub struct SweepResponse {
    pub sweep_id: String,
    pub summary: SweepSummary,
    pub manifest: SweepManifest,
    pub saved: SavedReport,
}

pub fn load_config(path: &Path) -> AppResult<SweepConfig> {
    Ok(ds_config::load_yaml(path)?)
}

/// Run a configured sweep against the real simulator and save the report.
pub fn run_sweep(config: &SweepConfig) -> AppResult<SweepResponse> {
    run_sweep_with_progress(config, ProcessDriver::new(&config.simulator), None)
}

/// Run a configured sweep with the given driver and stream progress events.
pub fn run_sweep_with_progress<D: SimulatorDriver>(
    config: &SweepConfig,
    driver: D,
    progress_cb: Option<&mut dyn FnMut(SweepProgressEvent)>,
) -> AppResult<SweepResponse> {
    validate_config(config)?;

    // Create the output directory up front so a bad path fails before the
    // simulator has been run at all.
    let store = ReportStore::new(config.output.dir.clone())?;
    let sweep_id = compute_sweep_id(config, TOOL_VERSION)?;

    let points = config.concentrations.generate_points();
    let mut controller = SweepController::from_config(config, driver)?;
    let summary = controller.run_with_progress(&points, progress_cb);

    let at = Local::now();
    let manifest = build_manifest(config, &summary, &sweep_id, at);
    let saved = store.save_at(&summary.results, &manifest, at)?;

    Ok(SweepResponse {
        sweep_id,
        summary,
        manifest,
        saved,
    })
}

pub fn build_manifest(
    config: &SweepConfig,
    summary: &SweepSummary,
    sweep_id: &str,
    at: DateTime<Local>,
) -> SweepManifest {
    SweepManifest {
        sweep_id: sweep_id.to_string(),
        timestamp: at.to_rfc3339(),
        base: config.base.name().to_string(),
        variable: config.variable.name().to_string(),
        chemistry: config.chemistry.name().to_string(),
        format: config.output.format,
        completed: summary.results.concentrations(),
        skipped: summary.skipped.clone(),
        partial: summary.partial.clone(),
    }
}

/// Compile the deck for a single point without running anything.
pub fn compile_point_deck(
    config: &SweepConfig,
    concentration: f64,
    density: Option<f64>,
) -> AppResult<InputDeck> {
    if !(concentration > 0.0 && concentration < 1.0) {
        return Err(AppError::InvalidInput(format!(
            "concentration {} outside (0, 1)",
            concentration
        )));
    }
    let base = config.base.resolve()?;
    let variable = config.variable.resolve()?;
    let chemistry = config.chemistry.resolve()?;
    Ok(compile_deck(&base, &variable, &chemistry, concentration, density)?)
}
