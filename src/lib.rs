//! Quality evaluation of feature-based molecular networking (FBMN) feature
//! tables.
//!
//! A feature table lists one `(id, m/z, retention time)` record per MS1
//! feature.  If feature detection merges too little, one molecular species
//! shows up as several features that sit within instrument tolerance of each
//! other.  This crate counts those near-duplicates and renders a
//! density-coloured scatter plot of the feature landscape.
//!
//! ```no_run
//! use std::path::Path;
//! use fbmn_eval::{evaluate_directory, EvaluationSettings};
//!
//! let report = evaluate_directory(
//!     Path::new("networks/"),
//!     Path::new("reports/"),
//!     &EvaluationSettings::default(),
//! )?;
//! for row in &report.rows {
//!     println!("{:?}", row);
//! }
//! # Ok::<(), fbmn_eval::EvalError>(())
//! ```

pub mod color;
pub mod data;
pub mod error;
pub mod evaluate;
pub mod output;
pub mod render;
pub mod settings;

pub use data::loader::load_file;
pub use data::model::{ColumnMapping, Feature, FeatureTable};
pub use data::proximity::{
    count_with_strategy, count_within_tolerance, neighbor_flags, ProximityStrategy,
};
pub use data::tolerance::{ppm_to_absolute, seconds_to_minutes, Tolerance};
pub use error::{EvalError, Result};
pub use evaluate::{evaluate_directory, evaluate_file, evaluate_single, input_files};
pub use output::{BatchReport, FileReport};
pub use render::{render, PlotSummary};
pub use settings::EvaluationSettings;
