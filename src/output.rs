use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::data::tolerance::Tolerance;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Artifact names
// ---------------------------------------------------------------------------

/// Extension of rendered plots.
pub const ARTIFACT_EXTENSION: &str = "svg";

/// Default file name of the aggregate report.
pub const DEFAULT_REPORT_NAME: &str = "evaluation_report.json";

/// Replace every run of non-alphanumeric characters with a single `_`.
pub fn sanitize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_run = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    out
}

/// Current local time as a file stem, e.g. `2020_05_01_12_34_56_123456`.
pub fn timestamp_stem() -> String {
    sanitize(&Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string())
}

/// `<output_dir>/<timestamp>.svg`
pub fn timestamp_artifact_path(output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}.{ARTIFACT_EXTENSION}", timestamp_stem()))
}

/// `<output_dir>/<input file name>.svg`, e.g. `quant.csv` → `quant.csv.svg`.
pub fn artifact_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(timestamp_stem);
    output_dir.join(format!("{name}.{ARTIFACT_EXTENSION}"))
}

// ---------------------------------------------------------------------------
// Aggregate report
// ---------------------------------------------------------------------------

/// Outcome of evaluating one input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub mz_tol_ppm: f64,
    pub rt_tol_sec: f64,
    /// `None` when the table could not be loaded.
    pub total_features: Option<usize>,
    pub tolerance_features: Option<usize>,
    /// `None` when no plot was written.
    pub artifact: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// Row for a file that failed before anything could be counted.
    pub fn failed(input: &Path, tolerance: &Tolerance, error: impl ToString) -> Self {
        FileReport {
            input: input.to_path_buf(),
            mz_tol_ppm: tolerance.mz_ppm,
            rt_tol_sec: tolerance.rt_sec,
            total_features: None,
            tolerance_features: None,
            artifact: None,
            error: Some(error.to_string()),
        }
    }
}

/// One row per input file, persisted as a single JSON snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub rows: Vec<FileReport>,
}

impl BatchReport {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        log::info!("Wrote report with {} row(s) to {}", self.rows.len(), path.display());
        Ok(())
    }

    pub fn read_json(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Rows whose file failed to load or render.
    pub fn failures(&self) -> impl Iterator<Item = &FileReport> {
        self.rows.iter().filter(|r| r.error.is_some())
    }
}
