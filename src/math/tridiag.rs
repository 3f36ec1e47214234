//! Symmetric tridiagonal matrices and their eigendecomposition.
//!
//! The solver is the implicit QL algorithm with shifts (the `tql2` family),
//! accumulating rotations into an identity matrix so the eigenvectors come out
//! orthonormal to working precision. It works directly on the two diagonals
//! and never forms the dense matrix.

use nalgebra::{DMatrix, DVector};

use crate::error::{TaperError, checked_area, try_zeroed};

/// QL sweeps allowed per eigenvalue before giving up.
const MAX_SWEEPS: usize = 60;

/// Symmetric tridiagonal matrix stored as its diagonal and first off-diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct SymTridiagonal {
    diagonal: Vec<f64>,
    off_diagonal: Vec<f64>,
}

impl SymTridiagonal {
    /// `off_diagonal.len()` must be `diagonal.len() - 1` (or `0` for an empty matrix).
    pub fn new(diagonal: Vec<f64>, off_diagonal: Vec<f64>) -> Result<Self, TaperError> {
        let expected = diagonal.len().saturating_sub(1);
        if off_diagonal.len() != expected {
            return Err(TaperError::dimension(format!(
                "Tridiagonal matrix of order {} needs {expected} off-diagonal entries, got {}.",
                diagonal.len(),
                off_diagonal.len()
            )));
        }
        Ok(Self {
            diagonal,
            off_diagonal,
        })
    }

    pub fn order(&self) -> usize {
        self.diagonal.len()
    }

    pub fn diagonal(&self) -> &[f64] {
        &self.diagonal
    }

    pub fn off_diagonal(&self) -> &[f64] {
        &self.off_diagonal
    }

    /// Dense copy, mostly useful for checks.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.order();
        let mut out = DMatrix::zeros(n, n);
        for i in 0..n {
            out[(i, i)] = self.diagonal[i];
        }
        for (i, &e) in self.off_diagonal.iter().enumerate() {
            out[(i, i + 1)] = e;
            out[(i + 1, i)] = e;
        }
        out
    }
}

/// Eigenvalues and matching orthonormal eigenvector columns.
#[derive(Debug, Clone)]
pub struct TridiagonalEigen {
    pub eigenvalues: DVector<f64>,
    pub eigenvectors: DMatrix<f64>,
}

/// Eigensolver contract used by the taper solver.
///
/// Implementations must return pairs in a deterministic order; the solver does
/// not assume any particular order relative to concentration.
pub trait TridiagonalEigenSolver {
    fn decompose(&self, matrix: &SymTridiagonal) -> Result<TridiagonalEigen, TaperError>;
}

/// Implicit QL with shifts; pairs are returned by descending eigenvalue.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicitQl;

impl TridiagonalEigenSolver for ImplicitQl {
    fn decompose(&self, matrix: &SymTridiagonal) -> Result<TridiagonalEigen, TaperError> {
        let n = matrix.order();
        if n == 0 {
            return Err(TaperError::dimension("Cannot decompose an empty tridiagonal matrix."));
        }

        let mut d = matrix.diagonal.clone();
        let mut e = try_zeroed(n, "QL off-diagonal workspace")?;
        e[..n - 1].copy_from_slice(&matrix.off_diagonal);

        let area = checked_area(n, n, "eigenvector matrix")?;
        let mut z = DMatrix::from_vec(n, n, try_zeroed(area, "eigenvector matrix")?);
        z.fill_with_identity();

        tql2(&mut d, &mut e, &mut z)?;

        // Descending eigenvalue order; ties keep their QL position.
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| d[b].total_cmp(&d[a]));

        let eigenvalues = DVector::from_iterator(n, order.iter().map(|&k| d[k]));
        let mut eigenvectors = DMatrix::from_vec(n, n, try_zeroed(area, "eigenvector matrix")?);
        for (dst, &src) in order.iter().enumerate() {
            eigenvectors.set_column(dst, &z.column(src));
        }

        Ok(TridiagonalEigen {
            eigenvalues,
            eigenvectors,
        })
    }
}

/// In-place implicit QL. On return `d` holds the eigenvalues and column `k` of
/// `z` the eigenvector for `d[k]`. `e[i]` couples rows `i` and `i + 1`; its last
/// entry is workspace.
fn tql2(d: &mut [f64], e: &mut [f64], z: &mut DMatrix<f64>) -> Result<(), TaperError> {
    let n = d.len();
    // Running norm estimate; keeps the split test meaningful when eigenvalues sit at zero.
    let mut tst1: f64 = 0.0;

    for l in 0..n {
        tst1 = tst1.max(d[l].abs() + e[l].abs());
        let mut sweeps = 0;
        loop {
            // Find a negligible off-diagonal element to split the matrix.
            let mut m = l;
            while m + 1 < n {
                if e[m].abs() <= f64::EPSILON * tst1 {
                    break;
                }
                m += 1;
            }
            if m == l {
                break;
            }

            sweeps += 1;
            if sweeps > MAX_SWEEPS {
                return Err(TaperError::convergence(format!(
                    "Implicit QL did not converge for eigenvalue {l} after {MAX_SWEEPS} sweeps."
                )));
            }

            // Shift from the leading 2x2 block.
            let mut g = (d[l + 1] - d[l]) / (2.0 * e[l]);
            let mut r = g.hypot(1.0);
            g = d[m] - d[l] + e[l] / (g + r.copysign(g));

            let (mut s, mut c, mut p) = (1.0, 1.0, 0.0);
            let mut deflated = false;
            let mut i = m;
            while i > l {
                i -= 1;
                let f = s * e[i];
                let b = c * e[i];
                r = f.hypot(g);
                e[i + 1] = r;
                if r == 0.0 {
                    // Underflow: recover and restart this sweep.
                    d[i + 1] -= p;
                    e[m] = 0.0;
                    deflated = true;
                    break;
                }
                s = f / r;
                c = g / r;
                g = d[i + 1] - p;
                r = (d[i] - g) * s + 2.0 * c * b;
                p = s * r;
                d[i + 1] = g + p;
                g = c * r - b;

                for k in 0..n {
                    let zk1 = z[(k, i + 1)];
                    let zk = z[(k, i)];
                    z[(k, i + 1)] = s * zk + c * zk1;
                    z[(k, i)] = c * zk - s * zk1;
                }
            }
            if deflated {
                continue;
            }

            d[l] -= p;
            e[l] = g;
            e[m] = 0.0;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(v: &DMatrix<f64>, tol: f64) {
        let gram = v.transpose() * v;
        let n = v.ncols();
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((gram[(i, j)] - expected).abs() < tol, "gram[{i},{j}]={}", gram[(i, j)]);
            }
        }
    }

    #[test]
    fn rejects_mismatched_diagonals() {
        let err = SymTridiagonal::new(vec![1.0, 2.0], vec![]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn one_by_one() {
        let t = SymTridiagonal::new(vec![-3.5], vec![]).unwrap();
        let eig = ImplicitQl.decompose(&t).unwrap();
        assert_eq!(eig.eigenvalues[0], -3.5);
        assert_eq!(eig.eigenvectors[(0, 0)], 1.0);
    }

    #[test]
    fn two_by_two_closed_form() {
        // [[1, -1], [-1, 3]] → 2 ± sqrt(2)
        let t = SymTridiagonal::new(vec![1.0, 3.0], vec![-1.0]).unwrap();
        let eig = ImplicitQl.decompose(&t).unwrap();
        assert!((eig.eigenvalues[0] - (2.0 + 2f64.sqrt())).abs() < 1e-13);
        assert!((eig.eigenvalues[1] - (2.0 - 2f64.sqrt())).abs() < 1e-13);
        assert_orthonormal(&eig.eigenvectors, 1e-13);
    }

    #[test]
    fn clean_chain_spectrum() {
        // d_i = 0, e_i = -1: eigenvalues 2 cos(kπ/(n+1)).
        let n = 40;
        let t = SymTridiagonal::new(vec![0.0; n], vec![-1.0; n - 1]).unwrap();
        let eig = ImplicitQl.decompose(&t).unwrap();
        for k in 1..=n {
            let exact = 2.0 * (k as f64 * std::f64::consts::PI / (n as f64 + 1.0)).cos();
            assert!((eig.eigenvalues[k - 1] - exact).abs() < 1e-12, "k={k}");
        }
        assert_orthonormal(&eig.eigenvectors, 1e-12);
    }

    #[test]
    fn matches_dense_symmetric_eigen() {
        let diag: Vec<f64> = (0..25).map(|i| ((i * 7) % 11) as f64 - 4.0).collect();
        let off: Vec<f64> = (0..24).map(|i| 0.5 + ((i * 3) % 5) as f64).collect();
        let t = SymTridiagonal::new(diag, off).unwrap();
        let dense = t.to_dense();

        let eig = ImplicitQl.decompose(&t).unwrap();
        let residual = &dense * &eig.eigenvectors
            - &eig.eigenvectors * DMatrix::from_diagonal(&eig.eigenvalues);
        assert!(residual.amax() < 1e-11, "residual {}", residual.amax());

        let mut reference: Vec<f64> = dense.symmetric_eigen().eigenvalues.iter().copied().collect();
        reference.sort_by(|a, b| b.total_cmp(a));
        for (ours, theirs) in eig.eigenvalues.iter().zip(reference.iter()) {
            assert!((ours - theirs).abs() < 1e-11);
        }
    }

    #[test]
    fn zero_diagonal_with_null_eigenvalue() {
        // Odd-order chain with zero diagonal has an exact zero eigenvalue.
        let t = SymTridiagonal::new(vec![0.0; 7], vec![0.3, 1.0, 2.0, 2.0, 1.0, 0.3]).unwrap();
        let eig = ImplicitQl.decompose(&t).unwrap();
        assert!(eig.eigenvalues.iter().any(|v| v.abs() < 1e-13));
        assert_orthonormal(&eig.eigenvectors, 1e-12);
    }

    #[test]
    fn eigenvalues_descend() {
        let t = SymTridiagonal::new(vec![5.0, -2.0, 0.5, 9.0], vec![1.0, 2.0, 0.1]).unwrap();
        let eig = ImplicitQl.decompose(&t).unwrap();
        assert!(eig.eigenvalues.as_slice().windows(2).all(|w| w[0] >= w[1]));

        // Reordered columns still pair with their eigenvalues.
        let residual = t.to_dense() * &eig.eigenvectors
            - &eig.eigenvectors * DMatrix::from_diagonal(&eig.eigenvalues);
        assert!(residual.amax() < 1e-12, "residual {}", residual.amax());
        assert_orthonormal(&eig.eigenvectors, 1e-13);
    }
}
