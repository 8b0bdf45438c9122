use std::f64::consts::PI;

use nalgebra::{Matrix2, Vector2};

use crate::error::{EvalError, Result};

// ---------------------------------------------------------------------------
// 2-D Gaussian kernel density estimate
// ---------------------------------------------------------------------------

/// Smallest accepted `1 - rho^2` of the sample covariance.  Below this the
/// points are collinear up to rounding.
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Gaussian KDE over 2-D points with a full-covariance kernel.
///
/// The kernel covariance is the sample covariance (ddof = 1) scaled by
/// Scott's factor `n^(-1/(d+4))`, i.e. `n^(-1/6)` in two dimensions.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<Vector2<f64>>,
    inv_cov: Matrix2<f64>,
    norm: f64,
}

impl GaussianKde {
    pub fn new(points: &[(f64, f64)]) -> Result<Self> {
        let n = points.len();
        if n < 2 {
            return Err(EvalError::InsufficientData {
                points: n,
                reason: "at least 2 points are required".to_string(),
            });
        }
        if n == 2 {
            return Err(EvalError::InsufficientData {
                points: n,
                reason: "two points always lie on a line (singular covariance)".to_string(),
            });
        }

        let samples: Vec<Vector2<f64>> = points.iter().map(|&(x, y)| Vector2::new(x, y)).collect();
        let mean = samples.iter().sum::<Vector2<f64>>() / n as f64;
        let cov = samples
            .iter()
            .map(|p| {
                let d = p - mean;
                d * d.transpose()
            })
            .sum::<Matrix2<f64>>()
            / (n - 1) as f64;

        let factor = (n as f64).powf(-1.0 / 6.0);
        let kernel_cov = cov * (factor * factor);

        // Collinear or coincident points give a singular covariance; the
        // kernel is undefined there.  `det / scale` is `1 - rho^2`, so the
        // test does not depend on the units of either axis.
        let det = kernel_cov.determinant();
        let scale = kernel_cov[(0, 0)] * kernel_cov[(1, 1)];
        if !det.is_finite() || scale <= 0.0 || det <= SINGULAR_TOLERANCE * scale {
            return Err(EvalError::InsufficientData {
                points: n,
                reason: "points are collinear or coincident (singular covariance)".to_string(),
            });
        }
        let inv_cov = kernel_cov
            .try_inverse()
            .ok_or_else(|| EvalError::InsufficientData {
                points: n,
                reason: "covariance matrix is not invertible".to_string(),
            })?;

        Ok(GaussianKde {
            samples,
            inv_cov,
            norm: 1.0 / (n as f64 * 2.0 * PI * det.sqrt()),
        })
    }

    /// Estimated density at `(x, y)`.
    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let at = Vector2::new(x, y);
        let sum: f64 = self
            .samples
            .iter()
            .map(|s| {
                let d = at - s;
                (-0.5 * d.dot(&(self.inv_cov * d))).exp()
            })
            .sum();
        sum * self.norm
    }
}

/// Density at each of the points themselves.
pub fn point_densities(points: &[(f64, f64)]) -> Result<Vec<f64>> {
    let kde = GaussianKde::new(points)?;
    Ok(points.iter().map(|&(x, y)| kde.evaluate(x, y)).collect())
}

/// Permutation that sorts by ascending density; ties keep their input order.
pub fn ascending_order(densities: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..densities.len()).collect();
    order.sort_by(|&a, &b| densities[a].total_cmp(&densities[b]));
    order
}

/// Points re-ordered so the densest are drawn last, with their densities.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityLayout {
    pub order: Vec<usize>,
    pub points: Vec<(f64, f64)>,
    pub densities: Vec<f64>,
}

impl DensityLayout {
    pub fn compute(points: &[(f64, f64)]) -> Result<Self> {
        let densities = point_densities(points)?;
        let order = ascending_order(&densities);
        Ok(DensityLayout {
            points: order.iter().map(|&i| points[i]).collect(),
            densities: order.iter().map(|&i| densities[i]).collect(),
            order,
        })
    }
}
