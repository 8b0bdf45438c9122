use serde::{Deserialize, Serialize};

use super::model::Feature;

/// Seconds per minute; retention times are stored in minutes.
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Absolute mass radius of a `ppm` tolerance around `mz`.
pub fn ppm_to_absolute(mz: f64, ppm: f64) -> f64 {
    (ppm / 1_000_000.0) * mz
}

/// Convert a retention-time tolerance in seconds to minutes.
pub fn seconds_to_minutes(seconds: f64) -> f64 {
    seconds / SECONDS_PER_MINUTE
}

/// Caller-facing tolerances: mass in ppm, retention time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub mz_ppm: f64,
    pub rt_sec: f64,
}

impl Tolerance {
    pub fn new(mz_ppm: f64, rt_sec: f64) -> Self {
        Tolerance { mz_ppm, rt_sec }
    }

    /// Resolve the unit conversion once for a whole query.
    pub fn window(&self) -> ToleranceWindow {
        ToleranceWindow {
            mz_ppm: self.mz_ppm,
            rt_radius: seconds_to_minutes(self.rt_sec),
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::new(20.0, 20.0)
    }
}

/// A tolerance with the retention-time radius already in minutes.
///
/// The mass radius is relative and therefore depends on the feature it is
/// centred on; see [`ToleranceWindow::bounds`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceWindow {
    pub mz_ppm: f64,
    pub rt_radius: f64,
}

/// Inclusive box centred on one feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub mz_lo: f64,
    pub mz_hi: f64,
    pub rt_lo: f64,
    pub rt_hi: f64,
}

impl Bounds {
    pub fn contains_mz(&self, mz: f64) -> bool {
        mz >= self.mz_lo && mz <= self.mz_hi
    }

    pub fn contains(&self, feature: &Feature) -> bool {
        self.contains_mz(feature.mz) && feature.rt >= self.rt_lo && feature.rt <= self.rt_hi
    }
}

impl ToleranceWindow {
    pub fn bounds(&self, center: &Feature) -> Bounds {
        let mz_radius = ppm_to_absolute(center.mz, self.mz_ppm);
        Bounds {
            mz_lo: center.mz - mz_radius,
            mz_hi: center.mz + mz_radius,
            rt_lo: center.rt - self.rt_radius,
            rt_hi: center.rt + self.rt_radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ppm_radius_scales_with_mass() {
        assert!((ppm_to_absolute(100.0, 20.0) - 0.002).abs() < 1e-12);
        assert!((ppm_to_absolute(1000.0, 20.0) - 0.02).abs() < 1e-12);
        assert_eq!(ppm_to_absolute(500.0, 0.0), 0.0);
    }

    #[test]
    fn rt_radius_is_in_minutes() {
        let window = Tolerance::new(20.0, 30.0).window();
        assert_eq!(window.rt_radius, 0.5);
        assert_eq!(seconds_to_minutes(90.0), 1.5);
    }

    #[test]
    fn bounds_are_inclusive() {
        let window = Tolerance::new(0.0, 30.0).window();
        let center = Feature::new("a", 100.0, 5.0);
        let bounds = window.bounds(&center);
        assert!(bounds.contains(&Feature::new("b", 100.0, 5.5)));
        assert!(bounds.contains(&Feature::new("c", 100.0, 4.5)));
        assert!(!bounds.contains(&Feature::new("d", 100.0, 5.51)));
        assert!(!bounds.contains(&Feature::new("e", 100.0001, 5.0)));
    }
}
