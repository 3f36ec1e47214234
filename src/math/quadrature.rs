//! Gauss–Legendre quadrature on an arbitrary interval.
//!
//! An `n`-point rule integrates polynomials of degree `<= 2n - 1` exactly. The
//! taper solver integrates squared band-limited functions of degree `2 lmax` in
//! `z = cos θ`, so `lmax + 1` points are enough.

use std::f64::consts::PI;

use crate::error::{TaperError, try_zeroed};

/// Newton iterations per root; convergence takes a handful in practice.
const MAX_NEWTON: usize = 100;

/// Absolute tolerance on a Newton step.
const NEWTON_EPS: f64 = 3.0e-15;

/// Source of quadrature nodes and weights over `[lower, upper]`.
pub trait QuadratureRule {
    fn rule(&self, lower: f64, upper: f64, count: usize) -> Result<(Vec<f64>, Vec<f64>), TaperError>;
}

/// Gauss–Legendre nodes via Newton iteration on the roots of `P_n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussLegendre;

impl QuadratureRule for GaussLegendre {
    fn rule(&self, lower: f64, upper: f64, count: usize) -> Result<(Vec<f64>, Vec<f64>), TaperError> {
        if count == 0 {
            return Err(TaperError::dimension("Quadrature rule needs at least one point."));
        }
        // A degenerate interval is allowed and yields zero weights.
        if !(lower.is_finite() && upper.is_finite() && upper >= lower) {
            return Err(TaperError::range(format!(
                "Invalid quadrature interval [{lower}, {upper}] (must be finite with upper >= lower)."
            )));
        }

        let mut nodes = try_zeroed(count, "quadrature nodes")?;
        let mut weights = try_zeroed(count, "quadrature weights")?;

        let n = count as f64;
        let mid = 0.5 * (upper + lower);
        let half = 0.5 * (upper - lower);

        // Roots are symmetric about the midpoint; solve for the upper half only.
        for i in 0..count.div_ceil(2) {
            let mut z = (PI * (i as f64 + 0.75) / (n + 0.5)).cos();
            let mut dp = 0.0;

            for _ in 0..MAX_NEWTON {
                let (p, d) = legendre_with_derivative(count, z);
                dp = d;
                let step = p / d;
                z -= step;
                if step.abs() <= NEWTON_EPS {
                    break;
                }
            }

            let w = 2.0 * half / ((1.0 - z * z) * dp * dp);
            nodes[i] = mid - half * z;
            nodes[count - 1 - i] = mid + half * z;
            weights[i] = w;
            weights[count - 1 - i] = w;
        }

        Ok((nodes, weights))
    }
}

/// `(P_n(z), P_n'(z))` via the three-term recurrence.
fn legendre_with_derivative(n: usize, z: f64) -> (f64, f64) {
    let mut p1 = 1.0;
    let mut p2 = 0.0;
    for j in 1..=n {
        let jf = j as f64;
        let p3 = p2;
        p2 = p1;
        p1 = ((2.0 * jf - 1.0) * z * p2 - (jf - 1.0) * p3) / jf;
    }
    let d = n as f64 * (z * p1 - p2) / (z * z - 1.0);
    (p1, d)
}
