//! Candidate store: the authoritative, append-only table of accepted candidates.

use std::collections::HashMap;

use crate::domain::error::{EnrichmentError, EnrichmentResult};
use crate::domain::models::candidate::Candidate;

/// Ordered table of candidates keyed by unique id.
///
/// `revision` is the persisted revision the table was loaded at. Repositories
/// compare it with the revision on disk before overwriting.
#[derive(Debug, Clone, Default)]
pub struct CandidateStore {
    candidates: Vec<Candidate>,
    index: HashMap<i64, usize>,
    revision: u64,
}

impl CandidateStore {
    /// Build a store at revision 0.
    pub fn new(candidates: Vec<Candidate>) -> EnrichmentResult<Self> {
        Self::with_revision(candidates, 0)
    }

    /// Build a store at a known revision, rejecting duplicate ids.
    pub fn with_revision(candidates: Vec<Candidate>, revision: u64) -> EnrichmentResult<Self> {
        let mut index = HashMap::with_capacity(candidates.len());
        for (position, candidate) in candidates.iter().enumerate() {
            if index.insert(candidate.id, position).is_some() {
                return Err(EnrichmentError::DuplicateCandidate(candidate.id));
            }
        }
        Ok(Self {
            candidates,
            index,
            revision,
        })
    }

    pub const fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Mutable access for score refreshes. Ids must not be changed.
    pub(crate) fn candidates_mut(&mut self) -> &mut [Candidate] {
        &mut self.candidates
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: i64) -> Option<&Candidate> {
        self.index.get(&id).map(|&position| &self.candidates[position])
    }

    /// Returns a new store with `additions` appended, keeping this revision.
    pub fn extended(&self, additions: Vec<Candidate>) -> EnrichmentResult<Self> {
        let mut candidates = Vec::with_capacity(self.candidates.len() + additions.len());
        candidates.extend(self.candidates.iter().cloned());
        candidates.extend(additions);
        Self::with_revision(candidates, self.revision)
    }

    /// Count of (positive, negative) labels.
    pub fn label_counts(&self) -> (usize, usize) {
        let positives = self.candidates.iter().filter(|c| c.is_prime).count();
        (positives, self.candidates.len() - positives)
    }

    pub fn false_elite_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_false_elite).count()
    }
}
