/// Rendering layer: density ordering and the scatter-plot artifact.
///
/// ```text
///   FeatureTable ──► (rt, mz) points
///        │
///        ▼
///   ┌──────────┐
///   │ density  │  Gaussian KDE at every point → ascending-density order
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  plot    │  coloured scatter + wrapped title → .svg
///   └──────────┘
/// ```
pub mod density;
pub mod plot;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::color::density_colors;
use crate::data::model::FeatureTable;
use crate::data::proximity::{neighbor_flags, ProximityStrategy};
use crate::data::tolerance::Tolerance;
use crate::error::Result;
use density::DensityLayout;

/// Character width the plot title is wrapped to.
pub const TITLE_WIDTH: usize = 60;

/// Run parameters and results shown in the plot title.
#[derive(Debug, Clone, Serialize)]
pub struct PlotSummary {
    pub label: String,
    pub tolerance: Tolerance,
    pub total_features: usize,
    pub tolerance_features: usize,
}

impl PlotSummary {
    pub fn title(&self) -> String {
        format!(
            "Input file: {}, Tested mz tolerance (ppm): {}, Tested rt tol (sec.): {}, \
             Total features: {}, Tolerance features: {}",
            self.label,
            self.tolerance.mz_ppm,
            self.tolerance.rt_sec,
            self.total_features,
            self.tolerance_features
        )
    }
}

/// Greedy word wrap; words longer than `width` are split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render a density-coloured `(rt, mz)` scatter plot of `table` to `output`.
///
/// Points are drawn in ascending density so the densest end up on top.
/// Features with a near-duplicate under `summary.tolerance` are ringed.
/// Fails with `InsufficientData` when the density cannot be estimated.
pub fn render(table: &FeatureTable, summary: &PlotSummary, output: &Path) -> Result<PathBuf> {
    let layout = DensityLayout::compute(&table.rt_mz_points())?;
    let colors = density_colors(&layout.densities);
    let title_lines = wrap_text(&summary.title(), TITLE_WIDTH);

    let flags = neighbor_flags(table, &summary.tolerance, ProximityStrategy::SortedMz);
    let highlight: Vec<bool> = layout.order.iter().map(|&i| flags[i]).collect();

    plot::density_scatter(output, &title_lines, &layout.points, &colors, &highlight)?;
    log::info!("Wrote plot for {} to {}", summary.label, output.display());
    Ok(output.to_path_buf())
}
