//! Scoring and threshold filtering of generated candidates.

use crate::domain::models::Candidate;
use crate::domain::ports::Scorer;

/// Score every candidate and keep those scoring strictly above `threshold`.
///
/// A score equal to the threshold is rejected, and so is NaN.
pub fn score_and_filter(
    candidates: Vec<Candidate>,
    scorer: &dyn Scorer,
    threshold: f64,
) -> Vec<Candidate> {
    candidates
        .into_iter()
        .map(|candidate| {
            let score = scorer.score(&candidate.features);
            candidate.with_score(score)
        })
        .filter(|candidate| candidate.score > threshold)
        .collect()
}
