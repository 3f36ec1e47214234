//! 4π-normalized ("geodesy") associated Legendre functions.
//!
//! Values are packed for all `0 <= m <= l <= lmax` at index `l(l+1)/2 + m`
//! (see [`legendre_index`]). The normalization is
//!
//! ```text
//! ∫_{-1}^{1} P̄_lm(z)² dz = 2 (2 - δ_m0)
//! ```
//!
//! so the full spherical harmonic `P̄_lm(cos θ) cos(mφ)` has mean square 1 on the
//! sphere.
//!
//! Numerical notes:
//! - The recurrence runs on `P̄_lm / u^m` (with `u = sin θ`) scaled by `SCALEF`;
//!   the factor `u^m / SCALEF` is applied only when a value is stored. This keeps
//!   sectoral terms from underflowing near the poles at high order.
//! - Recurrence coefficients depend only on `lmax`, so they are computed once
//!   per evaluator and reused for every colatitude.

use crate::error::{TaperError, checked_area, try_zeroed};

const SCALEF: f64 = 1.0e-280;

/// Packed index of degree `l`, order `m` (`m <= l`).
pub fn legendre_index(l: usize, m: usize) -> usize {
    l * (l + 1) / 2 + m
}

/// Number of packed values for all degrees `0..=lmax`.
pub fn legendre_len(lmax: usize) -> usize {
    (lmax + 1) * (lmax + 2) / 2
}

/// Evaluator holding its recurrence tables and output buffer.
///
/// Dropping the evaluator releases both.
#[derive(Debug, Clone)]
pub struct NormalizedLegendre {
    lmax: usize,
    a: Vec<f64>,
    b: Vec<f64>,
    values: Vec<f64>,
}

impl NormalizedLegendre {
    pub fn new(lmax: usize) -> Result<Self, TaperError> {
        // Guards the packed length below against overflow.
        checked_area(lmax + 1, lmax + 2, "Legendre buffer")?;
        let len = legendre_len(lmax);

        let mut a = try_zeroed(len, "Legendre recurrence table")?;
        let mut b = try_zeroed(len, "Legendre recurrence table")?;
        let values = try_zeroed(len, "Legendre value buffer")?;

        // P̄_lm = a_lm z P̄_{l-1,m} - b_lm P̄_{l-2,m}, for l >= m + 2.
        for m in 0..=lmax {
            for l in (m + 2)..=lmax {
                let lf = l as f64;
                let mf = m as f64;
                let k = legendre_index(l, m);
                let denom = (lf - mf) * (lf + mf);
                a[k] = ((2.0 * lf - 1.0) * (2.0 * lf + 1.0) / denom).sqrt();
                b[k] = ((2.0 * lf + 1.0) * (lf + mf - 1.0) * (lf - mf - 1.0)
                    / (denom * (2.0 * lf - 3.0)))
                    .sqrt();
            }
        }

        Ok(Self { lmax, a, b, values })
    }

    /// Evaluate all `P̄_lm(z)` for `z = cos θ` and return the packed buffer.
    pub fn evaluate(&mut self, z: f64) -> Result<&[f64], TaperError> {
        if !(z.is_finite() && (-1.0..=1.0).contains(&z)) {
            return Err(TaperError::range(format!(
                "Legendre argument z={z} must lie in [-1, 1]."
            )));
        }

        let lmax = self.lmax;
        let p = &mut self.values;
        let u = ((1.0 - z) * (1.0 + z)).sqrt();

        // Zonal column, unscaled.
        p[0] = 1.0;
        if lmax == 0 {
            return Ok(p.as_slice());
        }
        p[legendre_index(1, 0)] = 3f64.sqrt() * z;
        let (mut p2, mut p1) = (1.0, p[legendre_index(1, 0)]);
        for l in 2..=lmax {
            let k = legendre_index(l, 0);
            let v = self.a[k] * z * p1 - self.b[k] * p2;
            p[k] = v;
            p2 = p1;
            p1 = v;
        }

        // Non-zonal columns: `pmm` is the scaled sectoral term without its u^m.
        let mut pmm = SCALEF;
        let mut rescale = 1.0 / SCALEF;
        for m in 1..=lmax {
            let mf = m as f64;
            rescale *= u;
            pmm *= if m == 1 {
                3f64.sqrt()
            } else {
                ((2.0 * mf + 1.0) / (2.0 * mf)).sqrt()
            };
            p[legendre_index(m, m)] = pmm * rescale;
            if m == lmax {
                break;
            }

            let mut p2 = pmm;
            let mut p1 = (2.0 * mf + 3.0).sqrt() * z * pmm;
            p[legendre_index(m + 1, m)] = p1 * rescale;
            for l in (m + 2)..=lmax {
                let k = legendre_index(l, m);
                let v = self.a[k] * z * p1 - self.b[k] * p2;
                p[k] = v * rescale;
                p2 = p1;
                p1 = v;
            }
        }

        Ok(p.as_slice())
    }
}
