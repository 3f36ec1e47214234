//! Taper solver orchestration.
//!
//! Responsibilities:
//!
//! - validate parameters and caller buffers
//! - compose kernel builder, eigensolver and quadrature rule
//! - recompute concentration factors, order columns, fix zonal signs
//! - apply the caller's error mode

pub mod normalize;
pub mod options;
pub mod solver;

pub use normalize::*;
pub use options::*;
pub use solver::*;
