//! Score tracking log entries.
//!
//! One entry per (candidate, cycle) for every candidate present in both the
//! pre-cycle and post-cycle store. Entries are never rewritten once logged.

use serde::{Deserialize, Serialize};

/// A single row of the score tracking log.
///
/// Serialized field names match the log's tabular column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLogEntry {
    #[serde(rename = "Candidate")]
    pub candidate: i64,
    #[serde(rename = "Score_prev")]
    pub score_prev: f64,
    #[serde(rename = "Score_curr")]
    pub score_curr: f64,
    #[serde(rename = "BoundaryScore_prev")]
    pub boundary_prev: Option<f64>,
    #[serde(rename = "BoundaryScore_curr")]
    pub boundary_curr: Option<f64>,
    #[serde(rename = "Delta_Score")]
    pub delta_score: f64,
    #[serde(rename = "Delta_Boundary")]
    pub delta_boundary: Option<f64>,
    /// RFC 3339 timestamp shared by every entry of one cycle.
    #[serde(rename = "Cycle")]
    pub cycle: String,
}

impl ScoreLogEntry {
    /// Build an entry, deriving both deltas as `current - previous`.
    pub fn new(
        candidate: i64,
        (score_prev, score_curr): (f64, f64),
        (boundary_prev, boundary_curr): (Option<f64>, Option<f64>),
        cycle: impl Into<String>,
    ) -> Self {
        let delta_boundary = match (boundary_prev, boundary_curr) {
            (Some(prev), Some(curr)) => Some(curr - prev),
            _ => None,
        };
        Self {
            candidate,
            score_prev,
            score_curr,
            boundary_prev,
            boundary_curr,
            delta_score: score_curr - score_prev,
            delta_boundary,
            cycle: cycle.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deltas_are_current_minus_previous() {
        let entry = ScoreLogEntry::new(5, (0.8, 0.8), (Some(0.9), Some(0.6)), "c1");
        assert!(entry.delta_score.abs() < f64::EPSILON);
        assert_eq!(entry.delta_boundary, Some(0.6 - 0.9));
    }

    #[test]
    fn test_missing_boundary_leaves_delta_empty() {
        let entry = ScoreLogEntry::new(5, (0.2, 0.3), (None, Some(0.6)), "c1");
        assert_eq!(entry.delta_boundary, None);
        assert!((entry.delta_score - 0.1).abs() < 1e-12);
    }
}
