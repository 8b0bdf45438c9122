use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{EvalError, Result};

// ---------------------------------------------------------------------------
// Density scatter plot (SVG)
// ---------------------------------------------------------------------------

const WIDTH: u32 = 900;
const HEIGHT: u32 = 700;
const TITLE_FONT_SIZE: i32 = 16;
const TITLE_LINE_HEIGHT: i32 = 20;
const POINT_RADIUS: i32 = 3;
const HIGHLIGHT_RADIUS: i32 = 6;

fn render_err<E: Display>(e: E) -> EvalError {
    EvalError::Render(e.to_string())
}

/// Axis range covering `values` with a small margin on both sides.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { 0.5 };
    (min - pad)..(max + pad)
}

/// Draw `(rt, mz)` points in the given order with their colours under a
/// multi-line title, and write the result to `path`.
///
/// Points whose `highlight` entry is set get a black ring on top.
pub fn density_scatter(
    path: &Path,
    title_lines: &[String],
    points: &[(f64, f64)],
    colors: &[RGBColor],
    highlight: &[bool],
) -> Result<()> {
    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let title_height = TITLE_LINE_HEIGHT * title_lines.len() as i32 + 16;
    let (title_area, plot_area) = root.split_vertically(title_height);

    let title_style = TextStyle::from(("sans-serif", TITLE_FONT_SIZE).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, line) in title_lines.iter().enumerate() {
        let y = 8 + i as i32 * TITLE_LINE_HEIGHT;
        title_area
            .draw(&Text::new(
                line.as_str(),
                ((WIDTH / 2) as i32, y),
                title_style.clone(),
            ))
            .map_err(render_err)?;
    }

    let x_range = padded_range(points.iter().map(|p| p.0));
    let y_range = padded_range(points.iter().map(|p| p.1));

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(75)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Retention time in minutes")
        .y_desc("m/z values")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(
            points
                .iter()
                .zip(colors)
                .map(|(&(x, y), color)| Circle::new((x, y), POINT_RADIUS, color.filled())),
        )
        .map_err(render_err)?;

    chart
        .draw_series(
            points
                .iter()
                .zip(highlight)
                .filter(|(_, flagged)| **flagged)
                .map(|(&(x, y), _)| {
                    Circle::new((x, y), HIGHLIGHT_RADIUS, BLACK.stroke_width(1))
                }),
        )
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
