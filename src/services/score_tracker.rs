//! Score evolution tracking.
//!
//! Diffs the pre-cycle and post-cycle stores. Only candidates present in both
//! get an entry, so a candidate merged in this cycle is first logged by the
//! next one.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::models::{CandidateStore, ScoreLogEntry};

/// Format the identifier shared by every log entry of one cycle.
pub fn cycle_stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Inner-join `previous` and `current` on candidate id, in `previous` order.
pub fn track_score_evolution(
    previous: &CandidateStore,
    current: &CandidateStore,
    cycle: &str,
) -> Vec<ScoreLogEntry> {
    previous
        .iter()
        .filter_map(|prev| {
            current.get(prev.id).map(|curr| {
                ScoreLogEntry::new(
                    prev.id,
                    (prev.score, curr.score),
                    (prev.boundary_score, curr.boundary_score),
                    cycle,
                )
            })
        })
        .collect()
}
