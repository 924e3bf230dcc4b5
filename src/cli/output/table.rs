//! Table output formatting for CLI commands
//!
//! Candidate and trend tables using comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::fmt_opt;
use crate::domain::models::Candidate;
use crate::services::CandidateTrend;

/// Table formatter for CLI output
pub struct TableFormatter {
    use_colors: bool,
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format candidates with their scores and labels
    pub fn format_candidates(&self, candidates: &[Candidate]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&[
            "Candidate",
            "Score",
            "BoundaryScore",
            "IsPrime",
            "FalseElite",
        ]));

        for c in candidates {
            let label = if c.is_prime { "yes" } else { "no" };
            let label_cell = if self.use_colors {
                Cell::new(label).fg(if c.is_prime { Color::Green } else { Color::DarkGrey })
            } else {
                Cell::new(label)
            };
            table.add_row(vec![
                Cell::new(c.id),
                Cell::new(fmt_opt(Some(c.score))),
                Cell::new(fmt_opt(c.boundary_score)),
                label_cell,
                Cell::new(if c.is_false_elite { "yes" } else { "" }),
            ]);
        }

        table.to_string()
    }

    /// Format per-candidate trend aggregates
    pub fn format_trends(&self, trends: &[CandidateTrend]) -> String {
        let mut table = self.create_base_table();
        table.set_header(header(&[
            "Candidate",
            "Cycles",
            "Score last",
            "Score std",
            "ΔScore sum",
            "Boundary last",
            "Boundary std",
            "ΔBoundary sum",
        ]));

        for t in trends {
            let delta_cell = Cell::new(format!("{:+.4}", t.delta_score_sum));
            let delta_cell = if self.use_colors && t.delta_score_sum > 0.0 {
                delta_cell.fg(Color::Green)
            } else if self.use_colors && t.delta_score_sum < 0.0 {
                delta_cell.fg(Color::Red)
            } else {
                delta_cell
            };
            table.add_row(vec![
                Cell::new(t.candidate),
                Cell::new(t.cycles),
                Cell::new(format!("{:.4}", t.score_last)),
                Cell::new(fmt_opt(t.score_std)),
                delta_cell,
                Cell::new(fmt_opt(t.boundary_last)),
                Cell::new(fmt_opt(t.boundary_std)),
                Cell::new(format!("{:+.4}", t.delta_boundary_sum)),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|name| Cell::new(name).add_attribute(Attribute::Bold))
        .collect()
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Features;

    #[test]
    fn test_candidate_table_lists_rows() {
        let formatter = TableFormatter::with_config(false, Some(120));
        let candidates = vec![
            Candidate::new(101, Features::new(0.1, 0.2, 0.3, 0.4))
                .with_score(0.8)
                .with_boundary_score(0.9)
                .with_labels(true, false),
            Candidate::new(202, Features::new(0.1, 0.2, 0.3, 0.4)).with_score(0.3),
        ];

        let rendered = formatter.format_candidates(&candidates);
        assert!(rendered.contains("101"));
        assert!(rendered.contains("0.9000"));
        assert!(rendered.contains("202"));
        assert!(rendered.contains("BoundaryScore"));
    }
}
