//! Dense concentration matrix by direct quadrature.
//!
//! `D(l, l') = ∫_{cos θ0}^{1} P̄_l|m| P̄_l'|m| dz / (2 or 4)` over degrees
//! `|m|..=lmax`. Its eigenvalues are unreliable near 0 and 1, so the solver
//! never diagonalizes it; it serves as a reference for the commuting kernel
//! and for the trace identity `shannon == trace(D)`.

use nalgebra::DMatrix;

use crate::domain::CapParams;
use crate::error::TaperError;
use crate::math::{GaussLegendre, NormalizedLegendre, QuadratureRule, legendre_index};

pub fn dense_concentration(params: &CapParams) -> Result<DMatrix<f64>, TaperError> {
    params.validate()?;
    let degrees = params.degrees();
    let abs_m = params.abs_m();
    let n = degrees.count();

    let (nodes, weights) = GaussLegendre.rule(params.theta0.cos(), 1.0, params.size())?;
    let mut plm = NormalizedLegendre::new(params.lmax)?;
    let mut d = DMatrix::zeros(n, n);

    for (z, w) in nodes.iter().zip(weights.iter()) {
        let p = plm.evaluate(*z)?;
        for l1 in degrees.iter() {
            let p1 = p[legendre_index(l1, abs_m)];
            for l2 in degrees.iter() {
                d[(degrees.local(l1), degrees.local(l2))] += w * p1 * p[legendre_index(l2, abs_m)];
            }
        }
    }

    let norm = if params.m == 0 { 2.0 } else { 4.0 };
    Ok(d / norm)
}
