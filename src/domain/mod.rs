//! Domain types used throughout the taper pipeline.
//!
//! This module defines:
//!
//! - the immutable problem description (`CapParams`) and its valid degree range
//! - the owned result of one solve (`TaperSet`)

pub mod types;

pub use types::*;
