//! Ground-truth labeling of filtered candidates.

use crate::domain::models::{Candidate, ReferenceSets};

/// Label candidates purely by reference-set membership.
///
/// `IsPrime` is set from the positive set and `IsFalseElite` from the
/// negative set. Any label a candidate carried before is overwritten; a high
/// score alone never makes a candidate positive.
pub fn label_candidates(candidates: Vec<Candidate>, references: &ReferenceSets) -> Vec<Candidate> {
    candidates
        .into_iter()
        .map(|candidate| {
            let is_prime = references.is_positive(candidate.id);
            let is_false_elite = references.is_false_elite(candidate.id);
            candidate.with_labels(is_prime, is_false_elite)
        })
        .collect()
}
