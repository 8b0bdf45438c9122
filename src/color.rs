use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Density colour ramp
// ---------------------------------------------------------------------------

const HUE_LOW: f32 = 275.0;
const HUE_HIGH: f32 = 55.0;

/// Colour for a normalised density `t` in `[0, 1]`: dark purple through
/// blue and green to light yellow.
pub fn density_color(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
    let hue = HUE_LOW + (HUE_HIGH - HUE_LOW) * t;
    let lightness = 0.30 + 0.30 * t;
    let hsl = Hsl::new(hue, 0.75, lightness);
    let rgb: Srgb = hsl.into_color();
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Map densities onto the ramp, scaled between their minimum and maximum.
pub fn density_colors(densities: &[f64]) -> Vec<RGBColor> {
    let min = densities.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = densities.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    densities
        .iter()
        .map(|&d| {
            if range.abs() < f64::EPSILON {
                density_color(1.0)
            } else {
                density_color((d - min) / range)
            }
        })
        .collect()
}
