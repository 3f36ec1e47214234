//! Post-processing of eigenvector columns: concentration ordering and signs.

use log::debug;
use nalgebra::DMatrix;

use crate::domain::north_pole_value;

/// Slack allowed when checking that recomputed eigenvalues are monotone.
pub const ORDER_TOLERANCE: f64 = 1e-10;

/// How the solver's column order relates to the recomputed eigenvalues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrder {
    /// Already best-to-worst.
    Kept,
    /// Worst-to-best; columns are reversed.
    Reversed,
    /// Neither; columns are stable-sorted by descending eigenvalue.
    Sorted,
}

/// Column permutation that puts `eigenvalues` in descending order.
///
/// `perm[k]` is the source column of output column `k`.
pub fn concentration_order(eigenvalues: &[f64]) -> (ColumnOrder, Vec<usize>) {
    let n = eigenvalues.len();
    let descending = eigenvalues.windows(2).all(|w| w[1] <= w[0] + ORDER_TOLERANCE);
    if descending {
        return (ColumnOrder::Kept, (0..n).collect());
    }

    let ascending = eigenvalues.windows(2).all(|w| w[1] >= w[0] - ORDER_TOLERANCE);
    if ascending {
        return (ColumnOrder::Reversed, (0..n).rev().collect());
    }

    let mut perm: Vec<usize> = (0..n).collect();
    perm.sort_by(|&a, &b| eigenvalues[b].total_cmp(&eigenvalues[a]));
    (ColumnOrder::Sorted, perm)
}

/// Reorder the first `perm.len()` columns of `work` and the matching eigenvalues.
pub fn apply_order(work: &mut DMatrix<f64>, eigenvalues: &mut [f64], perm: &[usize]) {
    let columns = work.columns(0, perm.len()).into_owned();
    let values: Vec<f64> = perm.iter().map(|&src| eigenvalues[src]).collect();
    for (dst, &src) in perm.iter().enumerate() {
        work.set_column(dst, &columns.column(src));
    }
    eigenvalues[..perm.len()].copy_from_slice(&values);
}

/// Make every zonal taper non-negative at the north pole.
///
/// Returns the number of columns that were negated.
pub fn fix_zonal_signs(work: &mut DMatrix<f64>, columns: usize) -> usize {
    let rows = work.nrows();
    let mut flipped = 0;
    for j in 0..columns {
        let pole = north_pole_value(&work.as_slice()[j * rows..(j + 1) * rows]);
        if pole < 0.0 {
            for v in work.column_mut(j).iter_mut() {
                *v = -*v;
            }
            flipped += 1;
        }
    }
    debug!("Sign convention: negated {flipped} of {columns} zonal tapers");
    flipped
}
