use std::collections::HashSet;

/// Ground-truth id sets used to label candidates.
///
/// `positives` are known-positive ids; `negatives` are known false elites.
#[derive(Debug, Clone, Default)]
pub struct ReferenceSets {
    pub positives: HashSet<i64>,
    pub negatives: HashSet<i64>,
}

impl ReferenceSets {
    pub fn new(
        positives: impl IntoIterator<Item = i64>,
        negatives: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            positives: positives.into_iter().collect(),
            negatives: negatives.into_iter().collect(),
        }
    }

    pub fn is_positive(&self, id: i64) -> bool {
        self.positives.contains(&id)
    }

    pub fn is_false_elite(&self, id: i64) -> bool {
        self.negatives.contains(&id)
    }
}
