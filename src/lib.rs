//! `cap-tapers` library crate.
//!
//! Computes the band-limited spherical tapers that are optimally concentrated
//! in a polar cap, one angular order at a time.
//!
//! The binary (`tapers`) is a thin wrapper around this library so that:
//!
//! - the solver is testable without spawning processes
//! - callers can run independent orders in parallel on their own terms
//! - collaborators (kernel, eigensolver, quadrature) stay swappable

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod kernel;
pub mod math;
pub mod report;
pub mod taper;

pub use domain::{CapParams, TaperSet};
pub use error::{ErrorKind, TaperError};
pub use taper::{ErrorMode, SolverOptions, TaperSolver};
