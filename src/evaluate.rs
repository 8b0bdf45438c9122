use std::path::{Path, PathBuf};

use crate::data::loader::load_file;
use crate::data::proximity::count_with_strategy;
use crate::error::{EvalError, Result};
use crate::output::{artifact_path_for, timestamp_artifact_path, BatchReport, FileReport};
use crate::render::{render, PlotSummary};
use crate::settings::EvaluationSettings;

// ---------------------------------------------------------------------------
// Pipeline: load → count → render
// ---------------------------------------------------------------------------

/// Evaluate one feature table and write its plot to `artifact`.
///
/// Load errors are returned.  A table whose density cannot be estimated
/// still yields its counts; the render error is kept in the report row.
///
/// Counting compares every feature with its tolerance box; with the
/// exhaustive strategy that is O(n²) in the number of features.
pub fn evaluate_file(
    input: &Path,
    artifact: &Path,
    settings: &EvaluationSettings,
) -> Result<FileReport> {
    let tolerance = settings.tolerance();
    let table = load_file(input, &settings.columns)?;

    let total_features = table.len();
    let tolerance_features = count_with_strategy(&table, &tolerance, settings.strategy);
    log::info!(
        "{}: {} of {} features within {} ppm / {} s",
        input.display(),
        tolerance_features,
        total_features,
        tolerance.mz_ppm,
        tolerance.rt_sec
    );

    let summary = PlotSummary {
        label: input.display().to_string(),
        tolerance,
        total_features,
        tolerance_features,
    };
    let (artifact, error) = match render(&table, &summary, artifact) {
        Ok(path) => (Some(path), None),
        Err(e) => {
            log::error!("{}: no plot written: {e}", input.display());
            (None, Some(e.to_string()))
        }
    };

    Ok(FileReport {
        input: input.to_path_buf(),
        mz_tol_ppm: tolerance.mz_ppm,
        rt_tol_sec: tolerance.rt_sec,
        total_features: Some(total_features),
        tolerance_features: Some(tolerance_features),
        artifact,
        error,
    })
}

/// Evaluate a single file; the plot gets a timestamp-based name.
pub fn evaluate_single(
    input: &Path,
    output_dir: &Path,
    settings: &EvaluationSettings,
) -> Result<FileReport> {
    settings.validate()?;
    std::fs::create_dir_all(output_dir)?;
    evaluate_file(input, &timestamp_artifact_path(output_dir), settings)
}

/// Regular, non-hidden files directly inside `dir`, sorted by path.
///
/// Fails with a directory error when `dir` is missing, is not a directory
/// or holds no such files.
pub fn input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let directory_error = |reason: &str| EvalError::Directory {
        path: dir.to_path_buf(),
        reason: reason.to_string(),
    };

    if !dir.exists() {
        return Err(directory_error("does not exist"));
    }
    if !dir.is_dir() {
        return Err(directory_error("not a directory"));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden || !path.is_file() {
            log::debug!("Skipping {}", path.display());
            continue;
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err(directory_error("no input files"));
    }
    files.sort();
    Ok(files)
}

/// Evaluate every file in `input_dir`, one plot per file named after it.
///
/// Per-file failures are logged and recorded in the report; they never stop
/// the remaining files.  Only a directory error aborts the batch.
pub fn evaluate_directory(
    input_dir: &Path,
    output_dir: &Path,
    settings: &EvaluationSettings,
) -> Result<BatchReport> {
    settings.validate()?;
    let files = input_files(input_dir)?;
    std::fs::create_dir_all(output_dir)?;

    let mut report = BatchReport::default();
    for input in &files {
        let artifact = artifact_path_for(input, output_dir);
        match evaluate_file(input, &artifact, settings) {
            Ok(row) => report.rows.push(row),
            Err(e) if e.is_per_file() => {
                log::error!("Skipping {}: {e}", input.display());
                report
                    .rows
                    .push(FileReport::failed(input, &settings.tolerance(), e));
            }
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}
