//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - runs the taper solver in the requested error mode
//! - prints the summary or the JSON document

use clap::Parser;
use log::info;

use crate::cli::Cli;
use crate::error::{ErrorKind, TaperError};
use crate::report::{TaperDocument, format_summary};
use crate::taper::TaperSolver;

/// Entry point for the `tapers` binary.
pub fn run() -> Result<(), TaperError> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let params = cli.params();
    let solver = TaperSolver::with_options(cli.solver_options());

    info!(
        "Computing tapers: theta0={} deg, lmax={}, m={}, on_error={:?}",
        cli.theta0, params.lmax, params.m, solver.options().error_mode
    );
    let set = solver.run(&params)?;
    info!("Shannon number {:.6}", set.shannon);

    if cli.json {
        let doc = TaperDocument::from_set(&set);
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| TaperError::new(ErrorKind::Io, format!("Failed to serialize tapers: {e}")))?;
        println!("{text}");
    } else {
        println!("{}", format_summary(&set, cli.top, cli.threshold));
    }

    Ok(())
}

fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
