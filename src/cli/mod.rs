//! Command-line parsing for the `tapers` binary.
//!
//! Argument parsing stays separate from the numerical code; the library can be
//! used without pulling any of this in at runtime.

use clap::Parser;

use crate::domain::CapParams;
use crate::taper::{ErrorMode, SolverOptions};

/// Top-level CLI.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "tapers",
    version,
    about = "Band-limited tapers concentrated in a polar spherical cap"
)]
pub struct Cli {
    /// Angular radius of the cap, in degrees (0 < theta0 <= 180).
    #[arg(long, default_value_t = 30.0)]
    pub theta0: f64,

    /// Spherical-harmonic bandwidth.
    #[arg(short = 'l', long, default_value_t = 20)]
    pub lmax: usize,

    /// Angular order (|m| <= lmax).
    #[arg(short = 'm', long, default_value_t = 0, allow_negative_numbers = true)]
    pub m: i32,

    /// Number of eigenvalue rows to print.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Concentration threshold for counting well-concentrated tapers.
    #[arg(long, default_value_t = 0.5)]
    pub threshold: f64,

    /// Print the full taper set as JSON instead of the summary.
    #[arg(long)]
    pub json: bool,

    /// Return a status code on failure, or abort with a diagnostic.
    #[arg(long, value_enum, default_value_t = ErrorMode::Status)]
    pub on_error: ErrorMode,

    /// Keep the eigensolver's column order instead of sorting by concentration.
    #[arg(long)]
    pub keep_solver_order: bool,
}

impl Cli {
    pub fn params(&self) -> CapParams {
        CapParams::from_degrees(self.theta0, self.lmax, self.m)
    }

    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            error_mode: self.on_error,
            order_by_concentration: !self.keep_solver_order,
        }
    }
}
