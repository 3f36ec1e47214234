//! Taper computation for one cap radius, bandwidth and angular order.
//!
//! Pipeline:
//!
//! 1. build the commuting tridiagonal kernel
//! 2. take its eigenvectors from the tridiagonal eigensolver
//! 3. recompute each concentration factor from its definition by quadrature
//! 4. order columns by concentration, fix zonal signs, copy out
//!
//! The eigensolver's eigenvalues belong to the commuting kernel, not to the
//! concentration problem, and are discarded. Step 3 works on the already
//! orthonormal eigenvectors, so it stays accurate where many concentration
//! factors coincide with 0 or 1.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::domain::{CapParams, TaperSet};
use crate::error::{TaperError, checked_area, try_zeroed};
use crate::kernel::{GrunbaumKernel, KernelBuilder};
use crate::math::{
    GaussLegendre, ImplicitQl, NormalizedLegendre, QuadratureRule, TridiagonalEigenSolver,
    legendre_index,
};
use crate::taper::{
    SolverOptions, apply_order, concentration_order, exit_on_error, fix_zonal_signs,
};

/// Orchestrates the kernel builder, eigensolver and quadrature rule.
///
/// Holds no per-call state; independent calls may run concurrently.
#[derive(Debug, Clone)]
pub struct TaperSolver<K = GrunbaumKernel, E = ImplicitQl, Q = GaussLegendre> {
    kernel: K,
    eigen: E,
    quadrature: Q,
    options: SolverOptions,
}

impl TaperSolver {
    pub fn new() -> Self {
        Self::with_options(SolverOptions::default())
    }

    pub fn with_options(options: SolverOptions) -> Self {
        Self::from_parts(GrunbaumKernel, ImplicitQl, GaussLegendre, options)
    }
}

impl Default for TaperSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E, Q> TaperSolver<K, E, Q>
where
    K: KernelBuilder,
    E: TridiagonalEigenSolver,
    Q: QuadratureRule,
{
    pub fn from_parts(kernel: K, eigen: E, quadrature: Q, options: SolverOptions) -> Self {
        Self {
            kernel,
            eigen,
            quadrature,
            options,
        }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Compute tapers into caller-owned buffers.
    ///
    /// `tapers` must be at least `(lmax+1) x (lmax+1)` and `eigenvalues` at least
    /// `lmax+1` long; only that leading block is written. On error nothing is
    /// written.
    pub fn compute_into(
        &self,
        params: &CapParams,
        tapers: &mut DMatrix<f64>,
        eigenvalues: &mut DVector<f64>,
        shannon: Option<&mut f64>,
    ) -> Result<(), TaperError> {
        let size = output_size(params)?;
        if tapers.nrows() < size || tapers.ncols() < size {
            return Err(TaperError::dimension(format!(
                "Taper buffer is {}x{}, needs at least {size}x{size}.",
                tapers.nrows(),
                tapers.ncols()
            )));
        }
        if eigenvalues.len() < size {
            return Err(TaperError::dimension(format!(
                "Eigenvalue buffer has {} entries, needs at least {size}.",
                eigenvalues.len()
            )));
        }
        params.validate()?;

        let (work, lambda, total) = self.solve(params)?;

        tapers.view_mut((0, 0), (size, size)).copy_from(&work);
        for (dst, src) in eigenvalues.iter_mut().zip(lambda.iter()) {
            *dst = *src;
        }
        if let Some(out) = shannon {
            *out = total;
        }
        Ok(())
    }

    /// Compute tapers into freshly allocated buffers.
    pub fn compute(&self, params: &CapParams) -> Result<TaperSet, TaperError> {
        params.validate()?;
        let size = output_size(params)?;
        let area = checked_area(size, size, "taper matrix")?;
        let mut tapers = DMatrix::from_vec(size, size, try_zeroed(area, "taper matrix")?);
        let mut eigenvalues = DVector::from_vec(try_zeroed(size, "eigenvalue vector")?);
        let mut shannon = 0.0;
        self.compute_into(params, &mut tapers, &mut eigenvalues, Some(&mut shannon))?;
        Ok(TaperSet {
            params: *params,
            tapers,
            eigenvalues,
            shannon,
        })
    }

    /// [`TaperSolver::compute`] with the configured [`crate::taper::ErrorMode`] applied.
    pub fn run(&self, params: &CapParams) -> Result<TaperSet, TaperError> {
        self.options.error_mode.resolve(self.compute(params))
    }

    /// [`TaperSolver::compute_into`] that terminates the process with the
    /// error's status code instead of returning it.
    pub fn compute_or_exit(
        &self,
        params: &CapParams,
        tapers: &mut DMatrix<f64>,
        eigenvalues: &mut DVector<f64>,
        shannon: Option<&mut f64>,
    ) {
        exit_on_error(self.compute_into(params, tapers, eigenvalues, shannon));
    }

    /// Working pipeline on validated parameters. Returns the `(lmax+1)`-square
    /// taper block, the eigenvalue vector and the Shannon number.
    fn solve(&self, params: &CapParams) -> Result<(DMatrix<f64>, Vec<f64>, f64), TaperError> {
        let size = params.size();
        let degrees = params.degrees();
        let n = degrees.count();
        debug!(
            "Solving cap tapers: theta0={:.6} rad, lmax={}, m={}, n={n}",
            params.theta0, params.lmax, params.m
        );

        let kernel = self.kernel.build(params)?;
        if kernel.order() != n {
            return Err(TaperError::dimension(format!(
                "Kernel builder returned order {}, expected {n}.",
                kernel.order()
            )));
        }

        let eig = self.eigen.decompose(&kernel)?;
        if eig.eigenvectors.nrows() != n || eig.eigenvectors.ncols() != n {
            return Err(TaperError::dimension(format!(
                "Eigensolver returned {}x{} eigenvectors, expected {n}x{n}.",
                eig.eigenvectors.nrows(),
                eig.eigenvectors.ncols()
            )));
        }

        // Embed the eigenvectors at rows |m|..=lmax; everything else stays zero.
        let area = checked_area(size, size, "taper work buffer")?;
        let mut work = DMatrix::from_vec(size, size, try_zeroed(area, "taper work buffer")?);
        for j in 0..n {
            for l in degrees.iter() {
                work[(l, j)] = eig.eigenvectors[(degrees.local(l), j)];
            }
        }

        let mut lambda = self.concentrations(params, &work, n)?;
        let total: f64 = lambda.iter().sum();

        if self.options.order_by_concentration {
            let (order, perm) = concentration_order(&lambda[..n]);
            debug!("Column order after recomputation: {order:?}");
            apply_order(&mut work, &mut lambda, &perm);
        }

        if params.m == 0 {
            fix_zonal_signs(&mut work, n);
        }

        debug!("Shannon number {total:.6} for lmax={}, m={}", params.lmax, params.m);
        Ok((work, lambda, total))
    }

    /// Concentration factor of each column: `∫_{cos θ0}^{1} h_j(z)² dz`
    /// normalized by the full-sphere energy (2 for `m = 0`, 4 otherwise).
    ///
    /// Columns `n..=lmax` are zero and keep a zero factor.
    fn concentrations(
        &self,
        params: &CapParams,
        work: &DMatrix<f64>,
        n: usize,
    ) -> Result<Vec<f64>, TaperError> {
        let size = params.size();
        let abs_m = params.abs_m();
        let degrees = params.degrees();

        let (nodes, weights) = self.quadrature.rule(params.theta0.cos(), 1.0, size)?;
        if nodes.len() != size || weights.len() != size {
            return Err(TaperError::dimension(format!(
                "Quadrature rule returned {} nodes and {} weights, expected {size}.",
                nodes.len(),
                weights.len()
            )));
        }

        let mut plm = NormalizedLegendre::new(params.lmax)?;
        let mut lambda = try_zeroed(size, "eigenvalue work buffer")?;

        for (z, w) in nodes.iter().zip(weights.iter()) {
            let p = plm.evaluate(*z)?;
            for (j, value) in lambda.iter_mut().enumerate().take(n) {
                let h: f64 = degrees
                    .iter()
                    .map(|l| p[legendre_index(l, abs_m)] * work[(l, j)])
                    .sum();
                *value += w * h * h;
            }
        }

        let norm = if params.m == 0 { 2.0 } else { 4.0 };
        for value in lambda.iter_mut() {
            *value /= norm;
        }
        Ok(lambda)
    }
}

fn output_size(params: &CapParams) -> Result<usize, TaperError> {
    params
        .lmax
        .checked_add(1)
        .ok_or_else(|| TaperError::dimension(format!("Bandwidth lmax={} is too large.", params.lmax)))
}
