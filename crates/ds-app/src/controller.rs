//! Two-pass sweep controller.
//!
//! Every concentration point runs the same protocol against the simulator's
//! fixed input and report files:
//!
//! ```text
//! Init -> DensityUnknownCompiled -> DensityPassRun -> DensityExtracted
//!      -> FinalCompiled -> FinalPassRun -> Done
//! ```
//!
//! Any failing transition ends the point in `Aborted`. An aborted point is
//! logged and listed in the summary, and the sweep moves on to the next one.

use crate::driver::SimulatorDriver;
use crate::error::{AppResult, SweepError};
use crate::progress::{PointStage, SweepProgressEvent};
use ds_config::SweepConfig;
use ds_deck::{Chemistry, compile_deck, write_deck};
use ds_extract::{DIVERGENCE_MARKERS, DetonationRecord, OutputExtractor};
use ds_mixture::Mixture;
use ds_results::{PartialPoint, ResultSet, SkippedPoint};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// How one concentration point ended.
#[derive(Debug)]
pub enum PointOutcome {
    Done(DetonationRecord),
    Aborted {
        /// Stage the point failed to reach.
        stage: PointStage,
        error: SweepError,
    },
}

/// Non-terminal states and the data they carry forward.
enum PointState {
    Init,
    DensityUnknownCompiled,
    DensityPassRun,
    DensityExtracted { specific_volume: f64 },
    FinalCompiled { specific_volume: f64 },
    FinalPassRun { specific_volume: f64 },
    Done(DetonationRecord),
}

impl PointState {
    fn stage(&self) -> PointStage {
        match self {
            PointState::Init => PointStage::Init,
            PointState::DensityUnknownCompiled => PointStage::DensityUnknownCompiled,
            PointState::DensityPassRun => PointStage::DensityPassRun,
            PointState::DensityExtracted { .. } => PointStage::DensityExtracted,
            PointState::FinalCompiled { .. } => PointStage::FinalCompiled,
            PointState::FinalPassRun { .. } => PointStage::FinalPassRun,
            PointState::Done(_) => PointStage::Done,
        }
    }

    fn next_stage(&self) -> PointStage {
        match self {
            PointState::Init => PointStage::DensityUnknownCompiled,
            PointState::DensityUnknownCompiled => PointStage::DensityPassRun,
            PointState::DensityPassRun => PointStage::DensityExtracted,
            PointState::DensityExtracted { .. } => PointStage::FinalCompiled,
            PointState::FinalCompiled { .. } => PointStage::FinalPassRun,
            PointState::FinalPassRun { .. } | PointState::Done(_) => PointStage::Done,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SweepTiming {
    pub total_time_s: f64,
    /// Wall time spent inside simulator invocations.
    pub simulator_time_s: f64,
    pub simulator_runs: usize,
}

/// Everything a finished sweep produced.
#[derive(Debug, Clone, Default)]
pub struct SweepSummary {
    pub results: ResultSet,
    pub skipped: Vec<SkippedPoint>,
    pub partial: Vec<PartialPoint>,
    pub timing: SweepTiming,
}

impl SweepSummary {
    pub fn completed(&self) -> usize {
        self.results.len()
    }

    pub fn aborted(&self) -> usize {
        self.skipped.len()
    }

    pub fn attempted(&self) -> usize {
        self.completed() + self.aborted()
    }
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(SweepProgressEvent)>,
    index: usize,
    total: usize,
    concentration: f64,
    stage: PointStage,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(SweepProgressEvent {
            index,
            total,
            concentration,
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
        });
    }
}

/// Owns the simulator's input and report files for the whole sweep.
pub struct SweepController<D: SimulatorDriver> {
    base: Mixture,
    variable: Mixture,
    chemistry: Chemistry,
    input_file: PathBuf,
    output_file: PathBuf,
    extractor: OutputExtractor,
    driver: D,
    timing: SweepTiming,
}

impl<D: SimulatorDriver> SweepController<D> {
    /// Controller using `INPUT` and `output` in the current directory.
    pub fn new(
        base: Mixture,
        variable: Mixture,
        chemistry: Chemistry,
        extractor: OutputExtractor,
        driver: D,
    ) -> Self {
        Self {
            base,
            variable,
            chemistry,
            input_file: PathBuf::from("INPUT"),
            output_file: PathBuf::from("output"),
            extractor,
            driver,
            timing: SweepTiming::default(),
        }
    }

    pub fn with_files(mut self, input_file: PathBuf, output_file: PathBuf) -> Self {
        self.input_file = input_file;
        self.output_file = output_file;
        self
    }

    pub fn from_config(config: &SweepConfig, driver: D) -> AppResult<Self> {
        let base = config.base.resolve()?;
        let variable = config.variable.resolve()?;
        let chemistry = config.chemistry.resolve()?;

        let mut markers: Vec<String> = DIVERGENCE_MARKERS.iter().map(|m| m.to_string()).collect();
        for marker in &config.simulator.divergence_markers {
            if !markers.contains(marker) {
                markers.push(marker.clone());
            }
        }
        let extractor = OutputExtractor::with_markers(markers)?;

        Ok(Self::new(base, variable, chemistry, extractor, driver).with_files(
            config.simulator.input_file(),
            config.simulator.output_file(),
        ))
    }

    pub fn base(&self) -> &Mixture {
        &self.base
    }

    pub fn variable(&self) -> &Mixture {
        &self.variable
    }

    pub fn chemistry(&self) -> &Chemistry {
        &self.chemistry
    }

    pub fn input_file(&self) -> &Path {
        &self.input_file
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Run the sweep over `concentrations` in the given order.
    pub fn run(&mut self, concentrations: &[f64]) -> SweepSummary {
        self.run_with_progress(concentrations, None)
    }

    /// Run the sweep and stream a progress event for every state change.
    pub fn run_with_progress(
        &mut self,
        concentrations: &[f64],
        mut progress_cb: Option<&mut dyn FnMut(SweepProgressEvent)>,
    ) -> SweepSummary {
        let started = Instant::now();
        let total = concentrations.len();
        self.timing = SweepTiming::default();
        let mut summary = SweepSummary::default();

        info!(
            points = total,
            base = self.base.name(),
            variable = self.variable.name(),
            chemistry = %self.chemistry,
            "sweep started"
        );

        for (index, &concentration) in concentrations.iter().enumerate() {
            let outcome = self.process_point(index, total, concentration, started, &mut progress_cb);

            let (stage, error) = match outcome {
                PointOutcome::Done(record) => {
                    let missing: Vec<String> = record.missing.iter().map(|f| f.name()).collect();
                    match summary.results.insert(concentration, record) {
                        Ok(()) => {
                            if !missing.is_empty() {
                                summary.partial.push(PartialPoint {
                                    concentration,
                                    missing,
                                });
                            }
                            continue;
                        }
                        Err(e) => {
                            let error = SweepError::Rejected {
                                message: e.to_string(),
                            };
                            log_abort(concentration, PointStage::Done, &error);
                            (PointStage::Done, error)
                        }
                    }
                }
                PointOutcome::Aborted { stage, error } => (stage, error),
            };

            summary.skipped.push(SkippedPoint {
                concentration,
                stage: stage.name().to_string(),
                reason: error.to_string(),
            });
        }

        self.timing.total_time_s = started.elapsed().as_secs_f64();
        summary.timing = self.timing.clone();

        info!(
            completed = summary.completed(),
            aborted = summary.aborted(),
            partial = summary.partial.len(),
            total_time_s = summary.timing.total_time_s,
            "sweep finished"
        );
        summary
    }

    /// Run the two-pass protocol for one point.
    pub fn run_point(&mut self, concentration: f64) -> PointOutcome {
        self.process_point(0, 1, concentration, Instant::now(), &mut None)
    }

    fn process_point(
        &mut self,
        index: usize,
        total: usize,
        concentration: f64,
        started: Instant,
        progress_cb: &mut Option<&mut dyn FnMut(SweepProgressEvent)>,
    ) -> PointOutcome {
        let mut state = PointState::Init;
        emit_progress(progress_cb, index, total, concentration, state.stage(), started, None);

        loop {
            if let PointState::Done(record) = state {
                return PointOutcome::Done(record);
            }

            let target = state.next_stage();
            match self.advance(state, concentration) {
                Ok(next) => {
                    debug!(concentration, stage = %next.stage(), "point advanced");
                    emit_progress(progress_cb, index, total, concentration, next.stage(), started, None);
                    state = next;
                }
                Err(error) => {
                    log_abort(concentration, target, &error);
                    emit_progress(
                        progress_cb,
                        index,
                        total,
                        concentration,
                        PointStage::Aborted,
                        started,
                        Some(format!("{}: {}", target, error)),
                    );
                    return PointOutcome::Aborted {
                        stage: target,
                        error,
                    };
                }
            }
        }
    }

    fn advance(&mut self, state: PointState, concentration: f64) -> Result<PointState, SweepError> {
        match state {
            PointState::Init => {
                self.compile_and_write(concentration, None)?;
                Ok(PointState::DensityUnknownCompiled)
            }
            PointState::DensityUnknownCompiled => {
                self.run_simulator()?;
                Ok(PointState::DensityPassRun)
            }
            PointState::DensityPassRun => {
                let report = self.read_report()?;
                let specific_volume = self.extractor.extract_density(&report)?;
                Ok(PointState::DensityExtracted { specific_volume })
            }
            PointState::DensityExtracted { specific_volume } => {
                self.compile_and_write(concentration, Some(specific_volume))?;
                Ok(PointState::FinalCompiled { specific_volume })
            }
            PointState::FinalCompiled { specific_volume } => {
                self.run_simulator()?;
                Ok(PointState::FinalPassRun { specific_volume })
            }
            PointState::FinalPassRun { specific_volume } => {
                let report = self.read_report()?;
                let mut record = self.extractor.extract(&report)?;
                record.specific_volume = Some(specific_volume);
                Ok(PointState::Done(record))
            }
            PointState::Done(record) => Ok(PointState::Done(record)),
        }
    }

    fn compile_and_write(&self, concentration: f64, density: Option<f64>) -> Result<(), SweepError> {
        let deck = compile_deck(
            &self.base,
            &self.variable,
            &self.chemistry,
            concentration,
            density,
        )?;
        write_deck(&deck, &self.input_file)?;
        Ok(())
    }

    /// Remove the previous report, then invoke the simulator. A report left
    /// over from an earlier run must never be read as this run's output.
    fn run_simulator(&mut self) -> Result<(), SweepError> {
        match fs::remove_file(&self.output_file) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => {
                return Err(SweepError::OutputRead {
                    path: self.output_file.clone(),
                    source,
                });
            }
        }

        let started = Instant::now();
        let result = self.driver.invoke();
        self.timing.simulator_time_s += started.elapsed().as_secs_f64();
        self.timing.simulator_runs += 1;
        result?;
        Ok(())
    }

    /// The simulator writes plain ASCII; anything else is replaced rather
    /// than rejected.
    fn read_report(&self) -> Result<String, SweepError> {
        fs::read(&self.output_file)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|source| SweepError::OutputRead {
                path: self.output_file.clone(),
                source,
            })
    }
}

fn log_abort(concentration: f64, stage: PointStage, reason: &SweepError) {
    warn!(concentration, %stage, %reason, "concentration point aborted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverError, DriverResult};

    /// Driver that fails every invocation without touching any file.
    struct FailingDriver {
        calls: usize,
    }

    impl SimulatorDriver for FailingDriver {
        fn invoke(&mut self) -> DriverResult<()> {
            self.calls += 1;
            Err(DriverError::Timeout { timeout_s: 1.0 })
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("ds_controller_{}_{}", name, nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn controller<D: SimulatorDriver>(dir: &Path, driver: D) -> SweepController<D> {
        SweepController::new(
            Mixture::air(),
            Mixture::methane(),
            Chemistry::Methane,
            OutputExtractor::new().unwrap(),
            driver,
        )
        .with_files(dir.join("INPUT"), dir.join("output"))
    }

    #[test]
    fn state_order_matches_protocol() {
        let mut state = PointState::Init;
        let mut stages = vec![state.stage()];
        for _ in 0..6 {
            let next = state.next_stage();
            stages.push(next);
            state = match next {
                PointStage::DensityUnknownCompiled => PointState::DensityUnknownCompiled,
                PointStage::DensityPassRun => PointState::DensityPassRun,
                PointStage::DensityExtracted => PointState::DensityExtracted {
                    specific_volume: 1.0,
                },
                PointStage::FinalCompiled => PointState::FinalCompiled {
                    specific_volume: 1.0,
                },
                PointStage::FinalPassRun => PointState::FinalPassRun {
                    specific_volume: 1.0,
                },
                _ => PointState::Done(DetonationRecord::default()),
            };
        }
        assert_eq!(
            stages,
            vec![
                PointStage::Init,
                PointStage::DensityUnknownCompiled,
                PointStage::DensityPassRun,
                PointStage::DensityExtracted,
                PointStage::FinalCompiled,
                PointStage::FinalPassRun,
                PointStage::Done,
            ]
        );
    }

    #[test]
    fn simulator_failure_aborts_at_density_pass() {
        let dir = scratch_dir("fail");
        let mut ctl = controller(&dir, FailingDriver { calls: 0 });

        match ctl.run_point(0.1) {
            PointOutcome::Aborted { stage, error } => {
                assert_eq!(stage, PointStage::DensityPassRun);
                assert!(matches!(error, SweepError::Simulator(_)));
            }
            PointOutcome::Done(_) => panic!("point should abort"),
        }
        assert_eq!(ctl.into_driver().calls, 1);
    }

    #[test]
    fn failures_do_not_stop_the_sweep() {
        let dir = scratch_dir("continue");
        let mut ctl = controller(&dir, FailingDriver { calls: 0 });

        let summary = ctl.run(&[0.05, 0.1, 0.15]);
        assert_eq!(summary.completed(), 0);
        assert_eq!(summary.aborted(), 3);
        assert_eq!(summary.timing.simulator_runs, 3);
        assert!(
            summary
                .skipped
                .iter()
                .all(|s| s.stage == "density_pass_run" && s.reason.contains("timed out"))
        );
    }

    #[test]
    fn missing_deck_directory_aborts_before_running() {
        let dir = scratch_dir("nodir");
        let mut ctl = controller(&dir, FailingDriver { calls: 0 })
            .with_files(dir.join("absent").join("INPUT"), dir.join("output"));

        let summary = ctl.run(&[0.1]);
        assert_eq!(summary.skipped[0].stage, "density_unknown_compiled");
        assert_eq!(ctl.into_driver().calls, 0);
    }

    #[test]
    fn out_of_range_concentration_is_skipped() {
        let dir = scratch_dir("range");
        let mut ctl = controller(&dir, FailingDriver { calls: 0 });
        match ctl.run_point(1.5) {
            PointOutcome::Aborted { error, .. } => {
                assert!(matches!(error, SweepError::Mixture(_)))
            }
            PointOutcome::Done(_) => panic!("point should abort"),
        }
    }
}
