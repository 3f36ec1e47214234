//! Grünbaum's commuting tridiagonal kernel for a polar cap.
//!
//! For degrees `l = |m|..=L` and `x = cos θ0`:
//!
//! ```text
//! T(l, l)   = -l(l+1) x
//! T(l, l+1) = [l(l+2) - L(L+2)] sqrt(((l+1)² - m²) / ((2l+1)(2l+3)))
//! ```
//!
//! Every off-diagonal entry is non-zero (`l < L` and `l >= |m|`), so `T` is
//! unreduced and its eigenvalues are simple. That makes its eigenvectors those
//! of the concentration matrix, even when the latter's eigenvalues cluster at
//! 0 or 1.

use log::trace;

use crate::domain::CapParams;
use crate::error::{TaperError, try_zeroed};
use crate::kernel::KernelBuilder;
use crate::math::SymTridiagonal;

#[derive(Debug, Clone, Copy, Default)]
pub struct GrunbaumKernel;

impl KernelBuilder for GrunbaumKernel {
    fn build(&self, params: &CapParams) -> Result<SymTridiagonal, TaperError> {
        params.validate()?;
        let degrees = params.degrees();
        let n = degrees.count();

        let x = params.theta0.cos();
        let lmax = params.lmax as f64;
        let m2 = (params.abs_m() * params.abs_m()) as f64;
        let band = lmax * (lmax + 2.0);

        let mut diagonal = try_zeroed(n, "kernel diagonal")?;
        let mut off_diagonal = try_zeroed(n - 1, "kernel off-diagonal")?;

        for l in degrees.iter() {
            let i = degrees.local(l);
            let lf = l as f64;
            diagonal[i] = -lf * (lf + 1.0) * x;
            if l < params.lmax {
                let ratio = ((lf + 1.0) * (lf + 1.0) - m2) / ((2.0 * lf + 1.0) * (2.0 * lf + 3.0));
                off_diagonal[i] = (lf * (lf + 2.0) - band) * ratio.sqrt();
            }
        }

        trace!(
            "Grunbaum kernel: n={n}, lmax={}, m={}, cos(theta0)={x:.6}",
            params.lmax, params.m
        );
        SymTridiagonal::new(diagonal, off_diagonal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::dense_concentration;

    #[test]
    fn lmax_one_zonal_entries() {
        let theta0: f64 = 0.9;
        let t = GrunbaumKernel.build(&CapParams::new(theta0, 1, 0)).unwrap();
        assert_eq!(t.order(), 2);
        assert_eq!(t.diagonal()[0], 0.0);
        assert!((t.diagonal()[1] + 2.0 * theta0.cos()).abs() < 1e-15);
        assert!((t.off_diagonal()[0] + 3f64.sqrt()).abs() < 1e-14);
    }

    #[test]
    fn order_sets_kernel_size() {
        let t = GrunbaumKernel.build(&CapParams::new(0.5, 10, -4)).unwrap();
        assert_eq!(t.order(), 7);
        assert!(t.off_diagonal().iter().all(|v| *v != 0.0));
    }

    #[test]
    fn commutes_with_concentration_matrix() {
        for &(theta0, lmax, m) in &[(0.4, 8, 0), (1.1, 12, 3), (2.5, 9, -2), (0.3, 20, 7)] {
            let params = CapParams::new(theta0, lmax, m);
            let t = GrunbaumKernel.build(&params).unwrap().to_dense();
            let d = dense_concentration(&params).unwrap();
            let commutator = &t * &d - &d * &t;
            let scale = t.amax() * d.amax();
            assert!(
                commutator.amax() <= 1e-11 * scale,
                "theta0={theta0} lmax={lmax} m={m}: {}",
                commutator.amax()
            );
        }
    }

    #[test]
    fn rejects_order_above_bandwidth() {
        let err = GrunbaumKernel.build(&CapParams::new(0.5, 2, 3)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
