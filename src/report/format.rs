//! Terminal formatting for taper sets.
//!
//! Formatting lives here so the solver stays free of presentation concerns
//! and output changes are localized.

use crate::domain::TaperSet;

/// Format the run summary: parameters, Shannon number and the eigenvalue table.
pub fn format_summary(set: &TaperSet, top_n: usize, threshold: f64) -> String {
    let params = &set.params;
    let n = params.reduced_dim();
    let mut out = String::new();

    out.push_str("=== tapers - spherical cap concentration ===\n");
    out.push_str(&format!(
        "Cap: theta0={:.4} deg ({:.6} rad)\n",
        params.theta0.to_degrees(),
        params.theta0
    ));
    out.push_str(&format!(
        "Bandwidth: lmax={} | order m={} | tapers n={n}\n",
        params.lmax, params.m
    ));
    out.push_str(&format!("Shannon number: {:.6}\n", set.shannon));
    out.push_str(&format!(
        "Concentrated (lambda >= {threshold}): {}\n",
        set.concentrated_count(threshold)
    ));
    out.push('\n');

    out.push_str(&format_eigenvalue_table(set, top_n.min(n)));
    out
}

fn format_eigenvalue_table(set: &TaperSet, rows: usize) -> String {
    let zonal = set.params.m == 0;
    let mut out = String::new();

    let header = if zonal {
        format!("{:>5} {:>20} {:>14}", "j", "eigenvalue", "pole value")
    } else {
        format!("{:>5} {:>20}", "j", "eigenvalue")
    };
    out.push_str(header.trim_end());
    out.push('\n');
    let rule = if zonal {
        format!("{:->5} {:->20} {:->14}", "", "", "")
    } else {
        format!("{:->5} {:->20}", "", "")
    };
    out.push_str(&rule);
    out.push('\n');

    for j in 0..rows {
        let line = if zonal {
            format!(
                "{:>5} {:>20.15} {:>14.6}",
                j,
                set.eigenvalues[j],
                set.north_pole_value(j)
            )
        } else {
            format!("{:>5} {:>20.15}", j, set.eigenvalues[j])
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let remaining = set.params.reduced_dim().saturating_sub(rows);
    if remaining > 0 {
        out.push_str(&format!("... {remaining} more\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CapParams;
    use crate::taper::TaperSolver;

    #[test]
    fn summary_lists_requested_rows() {
        let set = TaperSolver::new()
            .compute(&CapParams::from_degrees(30.0, 10, 0))
            .unwrap();
        let text = format_summary(&set, 3, 0.5);
        assert!(text.contains("lmax=10"));
        assert!(text.contains("pole value"));
        assert!(text.contains("... 8 more"));
        let data_rows = text
            .lines()
            .filter(|l| l.trim_start().starts_with(|c: char| c.is_ascii_digit()))
            .count();
        assert_eq!(data_rows, 3);
    }

    #[test]
    fn non_zonal_table_has_no_pole_column() {
        let set = TaperSolver::new()
            .compute(&CapParams::from_degrees(30.0, 4, -2))
            .unwrap();
        let text = format_summary(&set, 10, 0.5);
        assert!(!text.contains("pole value"));
        assert!(!text.contains("more"));
    }
}
