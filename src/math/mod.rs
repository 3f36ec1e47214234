//! Numerical building blocks: Legendre functions, quadrature, tridiagonal eigensolver.

pub mod legendre;
pub mod quadrature;
pub mod tridiag;

pub use legendre::*;
pub use quadrature::*;
pub use tridiag::*;
