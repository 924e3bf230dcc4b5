//! Deduplication and merge of labeled candidates into the store.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::error::EnrichmentResult;
use crate::domain::models::{Candidate, CandidateStore};

/// Candidates accepted for merge, with counts of what was discarded.
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    /// New candidates in arrival order, unique by id
    pub accepted: Vec<Candidate>,
    /// Candidates dropped because the store already holds their id
    pub already_present: usize,
    /// Candidates dropped because an earlier one in the batch had their id
    pub batch_duplicates: usize,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    /// Append the accepted candidates to `store`, producing the updated store.
    pub fn apply(&self, store: &CandidateStore) -> EnrichmentResult<CandidateStore> {
        store.extended(self.accepted.clone())
    }
}

/// Split `labeled` into new candidates and ones the store already holds.
///
/// Within the batch the first occurrence of an id wins, so the updated store
/// keeps unique ids.
pub fn plan_merge(store: &CandidateStore, labeled: Vec<Candidate>) -> MergePlan {
    let mut plan = MergePlan::default();
    let mut seen = HashSet::with_capacity(labeled.len());

    for candidate in labeled {
        if store.contains(candidate.id) {
            plan.already_present += 1;
        } else if seen.insert(candidate.id) {
            plan.accepted.push(candidate);
        } else {
            plan.batch_duplicates += 1;
        }
    }

    debug!(
        accepted = plan.accepted.len(),
        already_present = plan.already_present,
        batch_duplicates = plan.batch_duplicates,
        "planned merge"
    );
    plan
}
