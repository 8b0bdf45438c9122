use std::path::PathBuf;

use clap::Parser;

use fbmn_eval::output::DEFAULT_REPORT_NAME;
use fbmn_eval::{EvaluationSettings, ProximityStrategy, Result};

/// Evaluate FBMN feature tables: count features within m/z and retention
/// time tolerance of another feature and plot the feature landscape.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory with GNPS / MZmine feature tables.
    #[arg(long, default_value = "networks/")]
    pub path: PathBuf,

    /// Evaluate a single feature table instead of a directory.
    #[arg(long, conflicts_with = "path")]
    pub file: Option<PathBuf>,

    /// Mass error in ppm [default: 20].
    #[arg(long)]
    pub mztol: Option<f64>,

    /// Retention time tolerance in seconds [default: 20].
    #[arg(long)]
    pub rttol: Option<f64>,

    /// Output directory for plots and the report.
    #[arg(long = "output_path", visible_alias = "output-path", default_value = "reports/")]
    pub output_path: PathBuf,

    /// JSON settings file; command line flags take precedence.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tolerance query strategy.
    #[arg(long, value_enum)]
    pub strategy: Option<ProximityStrategy>,

    /// File name of the aggregate report, written into the output directory.
    #[arg(long, default_value = DEFAULT_REPORT_NAME)]
    pub report: String,

    /// Do not write the aggregate report.
    #[arg(long)]
    pub no_report: bool,
}

impl Args {
    /// Defaults, overridden by the config file, overridden by flags.
    pub fn settings(&self) -> Result<EvaluationSettings> {
        let mut settings = match &self.config {
            Some(path) => EvaluationSettings::from_json_file(path)?,
            None => EvaluationSettings::default(),
        };
        if let Some(mztol) = self.mztol {
            settings.mz_tol_ppm = mztol;
        }
        if let Some(rttol) = self.rttol {
            settings.rt_tol_sec = rttol;
        }
        if let Some(strategy) = self.strategy {
            settings.strategy = strategy;
        }
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["fbmn-eval"]);
        assert_eq!(args.path, PathBuf::from("networks/"));
        assert_eq!(args.output_path, PathBuf::from("reports/"));
        assert!(args.file.is_none());
        assert_eq!(args.settings().unwrap(), EvaluationSettings::default());
    }

    #[test]
    fn original_flag_names() {
        let args = Args::parse_from([
            "fbmn-eval",
            "--path",
            "data/",
            "--mztol",
            "10",
            "--rttol",
            "6",
            "--output_path",
            "out/",
        ]);
        assert_eq!(args.path, PathBuf::from("data/"));
        assert_eq!(args.output_path, PathBuf::from("out/"));
        let settings = args.settings().unwrap();
        assert_eq!(settings.mz_tol_ppm, 10.0);
        assert_eq!(settings.rt_tol_sec, 6.0);
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("settings.json");
        let mut f = std::fs::File::create(&config).unwrap();
        f.write_all(br#"{"mz_tol_ppm": 5.0, "rt_tol_sec": 3.0, "strategy": "exhaustive"}"#)
            .unwrap();

        let args = Args::parse_from([
            "fbmn-eval",
            "--config",
            config.to_str().unwrap(),
            "--rttol",
            "12",
        ]);
        let settings = args.settings().unwrap();
        assert_eq!(settings.mz_tol_ppm, 5.0);
        assert_eq!(settings.rt_tol_sec, 12.0);
        assert_eq!(settings.strategy, ProximityStrategy::Exhaustive);
    }

    #[test]
    fn file_and_path_conflict() {
        let parsed = Args::try_parse_from(["fbmn-eval", "--path", "a/", "--file", "b.csv"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn negative_tolerance_fails() {
        let args = Args::parse_from(["fbmn-eval", "--mztol=-1"]);
        assert!(args.settings().is_err());
    }
}
