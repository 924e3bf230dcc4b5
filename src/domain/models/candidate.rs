//! Candidate domain model.
//!
//! A candidate is a numeric item described by four structural features:
//! - `MotifSum`: structural complexity
//! - `Entropy`: local/global signal coherence
//! - `HilbertMag`: harmonic signal strength
//! - `BoundaryTransitionIndex`: field transition behavior
//!
//! Any feature may be missing (an empty cell in the tabular store).

use serde::{Deserialize, Serialize};

/// Number of structural features per candidate.
pub const FEATURE_COUNT: usize = 4;

/// Column names of the feature dimensions, in `FeatureRow` order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["MotifSum", "Entropy", "HilbertMag", "BoundaryTransitionIndex"];

/// A complete feature vector, as consumed by classifiers.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// Structural feature vector with optional (missing) dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Features {
    pub motif_sum: Option<f64>,
    pub entropy: Option<f64>,
    pub hilbert_mag: Option<f64>,
    pub boundary_transition_index: Option<f64>,
}

impl Features {
    /// Create a feature vector with every dimension present.
    pub const fn new(
        motif_sum: f64,
        entropy: f64,
        hilbert_mag: f64,
        boundary_transition_index: f64,
    ) -> Self {
        Self {
            motif_sum: Some(motif_sum),
            entropy: Some(entropy),
            hilbert_mag: Some(hilbert_mag),
            boundary_transition_index: Some(boundary_transition_index),
        }
    }

    pub const fn from_values(values: [Option<f64>; FEATURE_COUNT]) -> Self {
        let [motif_sum, entropy, hilbert_mag, boundary_transition_index] = values;
        Self {
            motif_sum,
            entropy,
            hilbert_mag,
            boundary_transition_index,
        }
    }

    pub const fn values(&self) -> [Option<f64>; FEATURE_COUNT] {
        [
            self.motif_sum,
            self.entropy,
            self.hilbert_mag,
            self.boundary_transition_index,
        ]
    }

    /// Returns the dense row when every dimension is present and finite.
    ///
    /// NaN is treated the same as an empty cell.
    pub fn complete(&self) -> Option<FeatureRow> {
        let values = self.values();
        let mut row = [0.0; FEATURE_COUNT];
        for (slot, value) in row.iter_mut().zip(values) {
            match value {
                Some(v) if v.is_finite() => *slot = v,
                _ => return None,
            }
        }
        Some(row)
    }

    /// Apply `f` to every present dimension; missing dimensions stay missing.
    pub fn map_present(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self::from_values(self.values().map(|v| v.map(&mut f)))
    }
}

/// A uniquely identified candidate with its scores and labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub features: Features,
    /// Heuristic score. NaN until the candidate has been scored.
    pub score: f64,
    /// Learned probability of the positive class, refreshed every retrain.
    pub boundary_score: Option<f64>,
    pub is_prime: bool,
    pub is_false_elite: bool,
}

impl Candidate {
    /// Create an unscored, unlabeled candidate.
    pub const fn new(id: i64, features: Features) -> Self {
        Self {
            id,
            features,
            score: f64::NAN,
            boundary_score: None,
            is_prime: false,
            is_false_elite: false,
        }
    }

    pub const fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub const fn with_boundary_score(mut self, boundary_score: f64) -> Self {
        self.boundary_score = Some(boundary_score);
        self
    }

    pub const fn with_labels(mut self, is_prime: bool, is_false_elite: bool) -> Self {
        self.is_prime = is_prime;
        self.is_false_elite = is_false_elite;
        self
    }
}
