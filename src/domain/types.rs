//! Shared domain types.
//!
//! Parameters are small `Copy` values so they can be passed by value into every
//! collaborator. Results own their buffers; nothing here is shared across calls.

use std::f64::consts::PI;
use std::ops::RangeInclusive;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::TaperError;
use crate::math::{NormalizedLegendre, legendre_index};

/// Parameters of one concentration problem: a polar cap of radius `theta0`
/// (radians), bandwidth `lmax`, and angular order `m`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapParams {
    pub theta0: f64,
    pub lmax: usize,
    pub m: i32,
}

impl CapParams {
    pub fn new(theta0: f64, lmax: usize, m: i32) -> Self {
        Self { theta0, lmax, m }
    }

    /// Build parameters from a cap radius given in degrees.
    pub fn from_degrees(theta0_deg: f64, lmax: usize, m: i32) -> Self {
        Self::new(theta0_deg.to_radians(), lmax, m)
    }

    pub fn abs_m(&self) -> usize {
        self.m.unsigned_abs() as usize
    }

    /// Number of coefficient rows and taper columns in the output layout.
    pub fn size(&self) -> usize {
        self.lmax + 1
    }

    /// Size of the non-trivial kernel, `lmax + 1 - |m|`.
    ///
    /// Only meaningful once [`CapParams::validate`] has succeeded.
    pub fn reduced_dim(&self) -> usize {
        self.size().saturating_sub(self.abs_m())
    }

    pub fn degrees(&self) -> DegreeRange {
        DegreeRange {
            first: self.abs_m(),
            last: self.lmax,
        }
    }

    /// Check the order against the bandwidth and the cap radius against `(0, π]`.
    pub fn validate(&self) -> Result<(), TaperError> {
        if self.abs_m() > self.lmax {
            return Err(TaperError::range(format!(
                "Angular order |m|={} exceeds bandwidth lmax={}.",
                self.abs_m(),
                self.lmax
            )));
        }
        if !(self.theta0.is_finite() && self.theta0 > 0.0 && self.theta0 <= PI) {
            return Err(TaperError::range(format!(
                "Cap radius theta0={} must lie in (0, pi].",
                self.theta0
            )));
        }
        Ok(())
    }
}

/// Degrees `|m|..=lmax` that carry non-zero coefficients for a given order.
///
/// Rows outside this range are structurally zero; code that reads or writes
/// coefficients goes through this range instead of relying on the padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DegreeRange {
    pub first: usize,
    pub last: usize,
}

impl DegreeRange {
    /// Number of degrees in the range.
    pub fn count(&self) -> usize {
        self.last + 1 - self.first
    }

    pub fn iter(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }

    /// Position of `degree` inside the reduced (kernel-sized) vector.
    pub fn local(&self, degree: usize) -> usize {
        degree - self.first
    }
}

/// Tapers, concentration factors and Shannon number for one `(theta0, lmax, m)`.
///
/// `tapers` is `(lmax+1) x (lmax+1)`: column `j` holds the coefficients of taper
/// `j` indexed by degree, ordered from best to worst concentrated.
#[derive(Debug, Clone)]
pub struct TaperSet {
    pub params: CapParams,
    pub tapers: DMatrix<f64>,
    pub eigenvalues: DVector<f64>,
    pub shannon: f64,
}

impl TaperSet {
    /// Coefficients of taper `j`, indexed by degree `0..=lmax`.
    ///
    /// # Panics
    /// Panics if `j > lmax`.
    pub fn coefficients(&self, j: usize) -> &[f64] {
        let rows = self.tapers.nrows();
        &self.tapers.as_slice()[j * rows..(j + 1) * rows]
    }

    /// Number of tapers whose concentration factor is at least `threshold`.
    pub fn concentrated_count(&self, threshold: f64) -> usize {
        self.eigenvalues.iter().filter(|&&v| v >= threshold).count()
    }

    /// Value of taper `j` at the north pole, `Σ_l sqrt(2l+1) c_l`.
    ///
    /// Every `m != 0` term vanishes at the pole, so the result is `0` there.
    pub fn north_pole_value(&self, j: usize) -> f64 {
        if self.params.m != 0 {
            return 0.0;
        }
        north_pole_value(self.coefficients(j))
    }

    /// Meridional profile `Σ_l c_l P̄_l|m|(cos θ)` of taper `j` at `colatitude`.
    ///
    /// The full spherical function is this profile times `cos(mφ)` (or `sin(|m|φ)`
    /// for negative orders).
    pub fn profile(&self, j: usize, colatitude: f64) -> Result<f64, TaperError> {
        let abs_m = self.params.abs_m();
        let mut plm = NormalizedLegendre::new(self.params.lmax)?;
        let values = plm.evaluate(colatitude.cos())?;
        let coeffs = self.coefficients(j);
        Ok(self
            .params
            .degrees()
            .iter()
            .map(|l| values[legendre_index(l, abs_m)] * coeffs[l])
            .sum())
    }
}

/// `Σ_l sqrt(2l+1) c_l` for a zonal coefficient vector indexed by degree.
pub fn north_pole_value(coeffs: &[f64]) -> f64 {
    coeffs
        .iter()
        .enumerate()
        .map(|(l, c)| ((2 * l + 1) as f64).sqrt() * c)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_order_above_bandwidth() {
        let err = CapParams::new(1.0, 3, -4).validate().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(CapParams::new(1.0, 3, -3).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_cap_radius() {
        for theta0 in [0.0, -0.1, PI + 1e-9, f64::NAN, f64::INFINITY] {
            assert!(CapParams::new(theta0, 4, 0).validate().is_err(), "theta0={theta0}");
        }
        assert!(CapParams::new(PI, 4, 0).validate().is_ok());
    }

    #[test]
    fn degree_range_tracks_order() {
        let params = CapParams::from_degrees(30.0, 10, -3);
        let range = params.degrees();
        assert_eq!(range.first, 3);
        assert_eq!(range.count(), params.reduced_dim());
        assert_eq!(range.last, 10);
        assert_eq!(range.local(5), 2);
        assert_eq!(range.iter().count(), 8);
    }

    #[test]
    fn north_pole_value_of_constant_is_one() {
        assert!((north_pole_value(&[1.0, 0.0, 0.0]) - 1.0).abs() < 1e-15);
        assert!((north_pole_value(&[0.0, 1.0]) - 3f64.sqrt()).abs() < 1e-15);
    }
}
