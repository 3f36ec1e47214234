//! Reporting utilities: a serializable view of a taper set and terminal output.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::domain::{CapParams, TaperSet};

/// One taper in the JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct TaperRecord {
    pub index: usize,
    pub eigenvalue: f64,
    /// Coefficients for degrees `0..=lmax`.
    pub coefficients: Vec<f64>,
}

/// JSON-friendly view of a [`TaperSet`].
#[derive(Debug, Clone, Serialize)]
pub struct TaperDocument {
    pub tool: String,
    pub params: CapParams,
    pub theta0_degrees: f64,
    pub shannon: f64,
    pub tapers: Vec<TaperRecord>,
}

impl TaperDocument {
    /// Only the first `lmax + 1 - |m|` tapers are included; the rest are zero.
    pub fn from_set(set: &TaperSet) -> Self {
        let tapers = (0..set.params.reduced_dim())
            .map(|j| TaperRecord {
                index: j,
                eigenvalue: set.eigenvalues[j],
                coefficients: set.coefficients(j).to_vec(),
            })
            .collect();

        Self {
            tool: "tapers".to_string(),
            params: set.params,
            theta0_degrees: set.params.theta0.to_degrees(),
            shannon: set.shannon,
            tapers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taper::TaperSolver;

    #[test]
    fn document_skips_padding_columns() {
        let set = TaperSolver::new()
            .compute(&CapParams::from_degrees(40.0, 6, 2))
            .unwrap();
        let doc = TaperDocument::from_set(&set);
        assert_eq!(doc.tapers.len(), 5);
        assert!(doc.tapers.iter().all(|t| t.coefficients.len() == 7));
        assert!((doc.theta0_degrees - 40.0).abs() < 1e-12);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["params"]["lmax"], 6);
        assert_eq!(json["tapers"][0]["index"], 0);
    }
}
