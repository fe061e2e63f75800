//! Sweep configuration schema.

use crate::plan::{ConcentrationPlan, Segment};
use crate::validate::ValidationError;
use ds_deck::{Chemistry, CustomChemistry};
use ds_mixture::Mixture;
use ds_results::ResultFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepConfig {
    pub version: u32,
    pub simulator: SimulatorConfig,
    pub output: OutputConfig,
    pub base: MixtureDef,
    pub variable: MixtureDef,
    pub chemistry: ChemistryDef,
    pub concentrations: ConcentrationPlan,
}

/// Where and how the external simulator runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatorConfig {
    pub working_dir: PathBuf,
    pub executable: String,
    /// Optional wrapper the executable is passed to, e.g. a 16-bit loader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub launcher: Option<PathBuf>,
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: f64,
    /// Extra report substrings treated as divergence.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub divergence_markers: Vec<String>,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("INPUT")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output")
}

fn default_timeout_s() -> f64 {
    120.0
}

impl SimulatorConfig {
    /// Input deck path, relative paths resolved against the working directory.
    pub fn input_file(&self) -> PathBuf {
        self.working_dir.join(&self.input_path)
    }

    /// Report path, relative paths resolved against the working directory.
    pub fn output_file(&self) -> PathBuf {
        self.working_dir.join(&self.output_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub dir: PathBuf,
    #[serde(default)]
    pub format: ResultFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum MixtureDef {
    Standard { name: String },
    Inline { name: String, parts: Vec<(String, f64)> },
}

impl MixtureDef {
    pub fn standard(name: &str) -> Self {
        MixtureDef::Standard {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            MixtureDef::Standard { name } | MixtureDef::Inline { name, .. } => name,
        }
    }

    pub fn resolve(&self) -> Result<Mixture, ValidationError> {
        match self {
            MixtureDef::Standard { name } => {
                Mixture::standard(name).ok_or_else(|| ValidationError::UnknownMixture {
                    name: name.clone(),
                })
            }
            MixtureDef::Inline { name, parts } => {
                Ok(Mixture::new(name.clone(), parts.iter().cloned())?)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ChemistryDef {
    Builtin { name: String },
    Custom(CustomChemistry),
}

impl ChemistryDef {
    pub fn builtin(name: &str) -> Self {
        ChemistryDef::Builtin {
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ChemistryDef::Builtin { name } => name,
            ChemistryDef::Custom(custom) => &custom.name,
        }
    }

    pub fn resolve(&self) -> Result<Chemistry, ValidationError> {
        match self {
            ChemistryDef::Builtin { name } => {
                Chemistry::builtin(name).ok_or_else(|| ValidationError::UnknownChemistry {
                    name: name.clone(),
                })
            }
            ChemistryDef::Custom(custom) => Ok(Chemistry::Custom(custom.clone())),
        }
    }
}

impl SweepConfig {
    /// Acetylene in air over the reference grid: fine 0.01 steps up to 0.40,
    /// then 0.05 steps up to 0.95.
    pub fn reference() -> Self {
        Self {
            version: LATEST_VERSION,
            simulator: SimulatorConfig {
                working_dir: PathBuf::from("TIGER"),
                executable: "TIGER.EXE".to_string(),
                launcher: Some(PathBuf::from("otvdm.exe")),
                input_path: default_input_path(),
                output_path: default_output_path(),
                timeout_s: default_timeout_s(),
                divergence_markers: Vec::new(),
            },
            output: OutputConfig {
                dir: PathBuf::from("."),
                format: ResultFormat::Csv,
            },
            base: MixtureDef::standard("air"),
            variable: MixtureDef::standard("acetylene"),
            chemistry: ChemistryDef::builtin("acetylene"),
            concentrations: ConcentrationPlan {
                points: Vec::new(),
                segments: vec![
                    Segment {
                        start: 0.01,
                        end: 0.40,
                        step: 0.01,
                    },
                    Segment {
                        start: 0.45,
                        end: 0.95,
                        step: 0.05,
                    },
                ],
            },
        }
    }
}
