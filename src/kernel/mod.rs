//! Concentration-kernel construction.
//!
//! The solver never forms the dense concentration matrix. It asks a
//! [`KernelBuilder`] for a symmetric tridiagonal matrix that commutes with it,
//! so both share eigenvectors, and recomputes the eigenvalues itself.

pub mod dense;
pub mod grunbaum;

pub use dense::*;
pub use grunbaum::*;

use crate::domain::CapParams;
use crate::error::TaperError;
use crate::math::SymTridiagonal;

/// Produces the `n x n` tridiagonal kernel for degrees `|m|..=lmax`.
///
/// Builders that load or persist precomputed kernels report their failures
/// with [`crate::error::ErrorKind::Io`].
pub trait KernelBuilder {
    fn build(&self, params: &CapParams) -> Result<SymTridiagonal, TaperError>;
}
