//! Elite anchor selection.
//!
//! Anchors are the highest-ranked known positives in the store. They seed
//! candidate generation and are never persisted on their own.

use crate::domain::models::{Candidate, CandidateStore};
use crate::services::ordering::descending_missing_last;

/// Rank positive candidates by `(Score, BoundaryScore)` descending and keep `top_n`.
///
/// Returns fewer rows when the store holds fewer positives. Rows with equal
/// keys keep their store order.
pub fn select_elite_anchors(store: &CandidateStore, top_n: usize) -> Vec<Candidate> {
    let mut elite: Vec<&Candidate> = store.iter().filter(|c| c.is_prime).collect();

    elite.sort_by(|a, b| {
        descending_missing_last(Some(a.score), Some(b.score))
            .then_with(|| descending_missing_last(a.boundary_score, b.boundary_score))
    });

    elite.into_iter().take(top_n).cloned().collect()
}
