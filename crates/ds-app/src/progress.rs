use std::fmt;

/// Per-point state of the two-pass protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointStage {
    Init,
    DensityUnknownCompiled,
    DensityPassRun,
    DensityExtracted,
    FinalCompiled,
    FinalPassRun,
    Done,
    Aborted,
}

impl PointStage {
    pub fn name(&self) -> &'static str {
        match self {
            PointStage::Init => "init",
            PointStage::DensityUnknownCompiled => "density_unknown_compiled",
            PointStage::DensityPassRun => "density_pass_run",
            PointStage::DensityExtracted => "density_extracted",
            PointStage::FinalCompiled => "final_compiled",
            PointStage::FinalPassRun => "final_pass_run",
            PointStage::Done => "done",
            PointStage::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PointStage::Done | PointStage::Aborted)
    }
}

impl fmt::Display for PointStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct SweepProgressEvent {
    /// Zero-based position of the point in the sweep.
    pub index: usize,
    pub total: usize,
    pub concentration: f64,
    pub stage: PointStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl SweepProgressEvent {
    /// Fraction of points finished, counting this one when it is terminal.
    pub fn fraction_complete(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        let finished = self.index + usize::from(self.stage.is_terminal());
        finished as f64 / self.total as f64
    }
}
