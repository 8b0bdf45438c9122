mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;

use cli::Args;
use fbmn_eval::{evaluate_directory, evaluate_single, BatchReport};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = args.settings().context("resolving settings")?;

    let report = match &args.file {
        Some(file) => BatchReport {
            rows: vec![evaluate_single(file, &args.output_path, &settings)
                .with_context(|| format!("evaluating {}", file.display()))?],
        },
        None => evaluate_directory(&args.path, &args.output_path, &settings)?,
    };

    for row in &report.rows {
        let artifact = row
            .artifact
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        match (row.total_features, row.tolerance_features) {
            (Some(total), Some(within)) => println!("{artifact}\t{total}\t{within}"),
            _ => println!(
                "{}\tfailed: {}",
                row.input.display(),
                row.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }

    if !args.no_report {
        let path = args.output_path.join(&args.report);
        report
            .write_json(&path)
            .with_context(|| format!("writing report {}", path.display()))?;
    }

    Ok(())
}
