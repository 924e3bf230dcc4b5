//! Score evolution analytics.
//!
//! Aggregates the score tracking log per candidate and derives three views:
//! volatile (highest score spread), hovering (last score inside a band around
//! the decision threshold) and trending up (largest positive score drift).
//! Read-only; nothing flows back into the store.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::domain::models::{AnalyticsConfig, ScoreLogEntry};
use crate::services::ordering::descending_missing_last;

/// Per-candidate aggregate over every logged cycle.
///
/// Serialized names follow the `<column>_<aggregate>` convention of the
/// exported analytics tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateTrend {
    #[serde(rename = "Candidate")]
    pub candidate: i64,
    #[serde(rename = "Score_prev_first")]
    pub score_prev_first: f64,
    #[serde(rename = "Score_curr_last")]
    pub score_last: f64,
    #[serde(rename = "Score_curr_mean")]
    pub score_mean: f64,
    #[serde(rename = "Score_curr_std")]
    pub score_std: Option<f64>,
    #[serde(rename = "Score_curr_min")]
    pub score_min: f64,
    #[serde(rename = "Score_curr_max")]
    pub score_max: f64,
    #[serde(rename = "Delta_Score_sum")]
    pub delta_score_sum: f64,
    #[serde(rename = "Delta_Score_mean")]
    pub delta_score_mean: f64,
    #[serde(rename = "Delta_Score_max")]
    pub delta_score_max: f64,
    #[serde(rename = "BoundaryScore_prev_first")]
    pub boundary_prev_first: Option<f64>,
    #[serde(rename = "BoundaryScore_curr_last")]
    pub boundary_last: Option<f64>,
    #[serde(rename = "BoundaryScore_curr_mean")]
    pub boundary_mean: Option<f64>,
    #[serde(rename = "BoundaryScore_curr_std")]
    pub boundary_std: Option<f64>,
    #[serde(rename = "BoundaryScore_curr_min")]
    pub boundary_min: Option<f64>,
    #[serde(rename = "BoundaryScore_curr_max")]
    pub boundary_max: Option<f64>,
    #[serde(rename = "Delta_Boundary_sum")]
    pub delta_boundary_sum: f64,
    #[serde(rename = "Delta_Boundary_mean")]
    pub delta_boundary_mean: Option<f64>,
    #[serde(rename = "Delta_Boundary_max")]
    pub delta_boundary_max: Option<f64>,
    #[serde(rename = "Cycle_count")]
    pub cycles: usize,
}

impl CandidateTrend {
    /// Exported column names, in serialization order.
    pub const COLUMNS: [&'static str; 20] = [
        "Candidate",
        "Score_prev_first",
        "Score_curr_last",
        "Score_curr_mean",
        "Score_curr_std",
        "Score_curr_min",
        "Score_curr_max",
        "Delta_Score_sum",
        "Delta_Score_mean",
        "Delta_Score_max",
        "BoundaryScore_prev_first",
        "BoundaryScore_curr_last",
        "BoundaryScore_curr_mean",
        "BoundaryScore_curr_std",
        "BoundaryScore_curr_min",
        "BoundaryScore_curr_max",
        "Delta_Boundary_sum",
        "Delta_Boundary_mean",
        "Delta_Boundary_max",
        "Cycle_count",
    ];
}

/// The three derived views.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendReport {
    pub candidates_tracked: usize,
    pub volatile: Vec<CandidateTrend>,
    pub hovering: Vec<CandidateTrend>,
    pub trending_up: Vec<CandidateTrend>,
}

/// Summary statistics of one series; missing values are skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SeriesStats {
    last: f64,
    sum: f64,
    mean: f64,
    std: Option<f64>,
    min: f64,
    max: f64,
}

impl SeriesStats {
    fn of(values: &[f64]) -> Option<Self> {
        let &last = values.last()?;
        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let mean = sum / n;
        // Sample standard deviation, undefined for a single observation.
        let std = (values.len() > 1).then(|| {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1.0)).sqrt()
        });
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            last,
            sum,
            mean,
            std,
            min,
            max,
        })
    }
}

fn present(values: impl Iterator<Item = Option<f64>>) -> Vec<f64> {
    values.flatten().filter(|v| !v.is_nan()).collect()
}

/// Aggregates the score log into trend views
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    top_k: usize,
    hover_low: f64,
    hover_high: f64,
}

impl TrendAnalyzer {
    pub const fn new(top_k: usize, hover_low: f64, hover_high: f64) -> Self {
        Self {
            top_k,
            hover_low,
            hover_high,
        }
    }

    pub const fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(config.top_k, config.hover_low, config.hover_high)
    }

    /// One aggregate per candidate, ordered by candidate id.
    pub fn aggregate(&self, log: &[ScoreLogEntry]) -> Vec<CandidateTrend> {
        let mut groups: BTreeMap<i64, Vec<&ScoreLogEntry>> = BTreeMap::new();
        for entry in log {
            groups.entry(entry.candidate).or_default().push(entry);
        }

        groups
            .into_iter()
            .filter_map(|(candidate, entries)| Self::summarize(candidate, &entries))
            .collect()
    }

    /// `None` when no entry carries a usable current score or score delta.
    fn summarize(candidate: i64, entries: &[&ScoreLogEntry]) -> Option<CandidateTrend> {
        let score_prev = present(entries.iter().map(|e| Some(e.score_prev)));
        let score = SeriesStats::of(&present(entries.iter().map(|e| Some(e.score_curr))));
        let delta = SeriesStats::of(&present(entries.iter().map(|e| Some(e.delta_score))));
        let (Some(score), Some(delta)) = (score, delta) else {
            debug!(
                candidate,
                cycles = entries.len(),
                "no finite scores logged, candidate left out of trends"
            );
            return None;
        };
        let boundary_prev = present(entries.iter().map(|e| e.boundary_prev));
        let boundary = SeriesStats::of(&present(entries.iter().map(|e| e.boundary_curr)));
        let delta_boundary = SeriesStats::of(&present(entries.iter().map(|e| e.delta_boundary)));

        Some(CandidateTrend {
            candidate,
            score_prev_first: score_prev.first().copied().unwrap_or(f64::NAN),
            score_last: score.last,
            score_mean: score.mean,
            score_std: score.std,
            score_min: score.min,
            score_max: score.max,
            delta_score_sum: delta.sum,
            delta_score_mean: delta.mean,
            delta_score_max: delta.max,
            boundary_prev_first: boundary_prev.first().copied(),
            boundary_last: boundary.map(|s| s.last),
            boundary_mean: boundary.map(|s| s.mean),
            boundary_std: boundary.and_then(|s| s.std),
            boundary_min: boundary.map(|s| s.min),
            boundary_max: boundary.map(|s| s.max),
            delta_boundary_sum: delta_boundary.map_or(0.0, |s| s.sum),
            delta_boundary_mean: delta_boundary.map(|s| s.mean),
            delta_boundary_max: delta_boundary.map(|s| s.max),
            cycles: entries.len(),
        })
    }

    /// Aggregate `log` and derive the volatile, hovering and trending views.
    pub fn analyze(&self, log: &[ScoreLogEntry]) -> TrendReport {
        let trends = self.aggregate(log);

        let mut volatile = trends.clone();
        volatile.sort_by(|a, b| descending_missing_last(a.score_std, b.score_std));
        volatile.truncate(self.top_k);

        let mut hovering: Vec<CandidateTrend> = trends
            .iter()
            .filter(|t| t.score_last > self.hover_low && t.score_last < self.hover_high)
            .cloned()
            .collect();
        hovering.sort_by(|a, b| descending_missing_last(Some(a.score_last), Some(b.score_last)));

        let mut trending_up: Vec<CandidateTrend> = trends
            .iter()
            .filter(|t| t.delta_score_sum > 0.0)
            .cloned()
            .collect();
        trending_up.sort_by(|a, b| {
            descending_missing_last(Some(a.delta_score_sum), Some(b.delta_score_sum))
        });
        trending_up.truncate(self.top_k);

        TrendReport {
            candidates_tracked: trends.len(),
            volatile,
            hovering,
            trending_up,
        }
    }
}

impl Default for TrendAnalyzer {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(candidate: i64, prev: f64, curr: f64, cycle: &str) -> ScoreLogEntry {
        ScoreLogEntry::new(candidate, (prev, curr), (Some(0.5), Some(0.6)), cycle)
    }

    #[test]
    fn test_aggregate_statistics() {
        let log = vec![
            entry(7, 0.60, 0.70, "c1"),
            entry(7, 0.70, 0.74, "c2"),
            entry(7, 0.74, 0.72, "c3"),
        ];

        let trends = TrendAnalyzer::default().aggregate(&log);
        assert_eq!(trends.len(), 1);
        let t = &trends[0];

        assert_eq!(t.cycles, 3);
        assert!((t.score_prev_first - 0.60).abs() < 1e-12);
        assert!((t.score_last - 0.72).abs() < 1e-12);
        assert!((t.score_mean - 0.72).abs() < 1e-12);
        assert!((t.score_min - 0.70).abs() < 1e-12);
        assert!((t.score_max - 0.74).abs() < 1e-12);
        assert!((t.score_std.expect("three observations") - 0.02).abs() < 1e-9);
        assert!((t.delta_score_sum - 0.12).abs() < 1e-12);
        assert!((t.delta_boundary_sum - 0.3).abs() < 1e-12);
        assert_eq!(t.boundary_prev_first, Some(0.5));
    }

    #[test]
    fn test_single_observation_has_no_std() {
        let trends = TrendAnalyzer::default().aggregate(&[entry(1, 0.5, 0.5, "c1")]);
        assert_eq!(trends[0].score_std, None);
        assert_eq!(trends[0].boundary_std, None);
    }

    #[test]
    fn test_missing_boundary_values_are_skipped() {
        let mut first = entry(3, 0.5, 0.5, "c1");
        first.boundary_prev = None;
        first.delta_boundary = None;
        let log = vec![first, entry(3, 0.5, 0.5, "c2")];

        let trends = TrendAnalyzer::default().aggregate(&log);
        assert_eq!(trends[0].boundary_prev_first, Some(0.5));
        assert!((trends[0].delta_boundary_sum - 0.1).abs() < 1e-12);
        assert_eq!(trends[0].cycles, 2);
    }

    #[test]
    fn test_hovering_band_is_open() {
        let log = vec![
            entry(1, 0.5, 0.70, "c1"),
            entry(2, 0.5, 0.75, "c1"),
            entry(3, 0.5, 0.80, "c1"),
            entry(4, 0.5, 0.79, "c1"),
        ];

        let report = TrendAnalyzer::default().analyze(&log);
        let ids: Vec<i64> = report.hovering.iter().map(|t| t.candidate).collect();
        assert_eq!(ids, vec![4, 2]);
    }

    #[test]
    fn test_volatile_and_trending_views() {
        let log = vec![
            entry(1, 0.1, 0.9, "c1"),
            entry(1, 0.9, 0.1, "c2"),
            entry(2, 0.5, 0.52, "c1"),
            entry(2, 0.52, 0.55, "c2"),
            entry(3, 0.4, 0.3, "c1"),
        ];

        let report = TrendAnalyzer::new(2, 0.7, 0.8).analyze(&log);

        assert_eq!(report.candidates_tracked, 3);
        let volatile: Vec<i64> = report.volatile.iter().map(|t| t.candidate).collect();
        assert_eq!(volatile, vec![1, 2]);

        let trending: Vec<i64> = report.trending_up.iter().map(|t| t.candidate).collect();
        assert_eq!(trending, vec![2]);
    }

    #[test]
    fn test_candidate_without_finite_scores_is_left_out() {
        let log = vec![
            entry(8, f64::NAN, f64::NAN, "c1"),
            entry(8, f64::NAN, f64::NAN, "c2"),
            entry(9, 0.5, 0.6, "c1"),
        ];

        let trends = TrendAnalyzer::default().aggregate(&log);
        let ids: Vec<i64> = trends.iter().map(|t| t.candidate).collect();
        assert_eq!(ids, vec![9]);
        assert_eq!(TrendAnalyzer::default().analyze(&log).candidates_tracked, 1);
    }

    #[test]
    fn test_columns_match_serialized_header() {
        let trends = TrendAnalyzer::default().aggregate(&[entry(1, 0.5, 0.6, "c1")]);
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&trends[0]).unwrap();
        let bytes = writer.into_inner().ok().expect("in-memory writer flushes");
        let text = String::from_utf8(bytes).unwrap();

        let header = text.lines().next().unwrap();
        assert_eq!(header, CandidateTrend::COLUMNS.join(","));
    }

    #[test]
    fn test_empty_log() {
        let report = TrendAnalyzer::default().analyze(&[]);
        assert_eq!(report.candidates_tracked, 0);
        assert!(report.volatile.is_empty());
    }
}
