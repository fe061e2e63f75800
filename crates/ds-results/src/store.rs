//! Report file storage.

use crate::csv;
use crate::types::{ResultFormat, ResultSet, SweepManifest};
use crate::{ResultsError, ResultsResult};
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Paths of one saved dataset and its manifest.
#[derive(Debug, Clone)]
pub struct SavedReport {
    pub report_path: PathBuf,
    pub manifest_path: PathBuf,
}

#[derive(Clone)]
pub struct ReportStore {
    output_dir: PathBuf,
}

impl ReportStore {
    pub fn new(output_dir: PathBuf) -> ResultsResult<Self> {
        if !output_dir.exists() {
            fs::create_dir_all(&output_dir)?;
        }
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `results_<YYYY-mm-dd_HH-MM-SS>.<ext>` in the output directory.
    pub fn report_path(&self, at: DateTime<Local>, format: ResultFormat) -> PathBuf {
        self.numbered_path(at, format, 0)
    }

    fn numbered_path(&self, at: DateTime<Local>, format: ResultFormat, n: usize) -> PathBuf {
        let stamp = at.format("%Y-%m-%d_%H-%M-%S");
        let name = if n == 0 {
            format!("results_{}.{}", stamp, format.extension())
        } else {
            format!("results_{}_{}.{}", stamp, n, format.extension())
        };
        self.output_dir.join(name)
    }

    /// Create a report file that did not exist before. Saves within the same
    /// second get a `_<n>` suffix instead of replacing the earlier report.
    fn create_report_file(
        &self,
        at: DateTime<Local>,
        format: ResultFormat,
    ) -> ResultsResult<(PathBuf, File)> {
        let mut n = 0;
        loop {
            let path = self.numbered_path(at, format, n);
            n += 1;
            if path.with_extension("manifest.json").exists() {
                continue;
            }
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Write the dataset and its manifest, stamped with the current time.
    pub fn save(
        &self,
        results: &ResultSet,
        manifest: &SweepManifest,
    ) -> ResultsResult<SavedReport> {
        self.save_at(results, manifest, Local::now())
    }

    pub fn save_at(
        &self,
        results: &ResultSet,
        manifest: &SweepManifest,
        at: DateTime<Local>,
    ) -> ResultsResult<SavedReport> {
        let content = match manifest.format {
            ResultFormat::Json => results.to_json()?,
            ResultFormat::Csv => csv::to_csv(results),
        };
        let manifest_json = serde_json::to_string_pretty(manifest)?;

        let (report_path, mut file) = self.create_report_file(at, manifest.format)?;
        file.write_all(content.as_bytes())?;

        let manifest_path = report_path.with_extension("manifest.json");
        fs::write(&manifest_path, manifest_json)?;

        tracing::info!(
            report = %report_path.display(),
            rows = results.len(),
            skipped = manifest.skipped.len(),
            "report saved"
        );
        Ok(SavedReport {
            report_path,
            manifest_path,
        })
    }
}

/// Read a dataset back, choosing the parser from the file extension.
pub fn load_report(path: &Path) -> ResultsResult<ResultSet> {
    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ResultFormat::from_extension)
        .ok_or_else(|| ResultsError::UnknownFormat {
            path: path.display().to_string(),
        })?;

    let content = fs::read_to_string(path)?;
    match format {
        ResultFormat::Json => ResultSet::from_json(&content),
        ResultFormat::Csv => csv::from_csv(&content),
    }
}

pub fn load_manifest(path: &Path) -> ResultsResult<SweepManifest> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
