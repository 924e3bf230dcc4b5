//! Weighted-sum heuristic scorer.

use crate::domain::models::{Features, ScoringConfig};
use crate::domain::ports::Scorer;

/// `motif*MotifSum + entropy*Entropy + hilbert*HilbertMag
/// + stability*(1 - |BoundaryTransitionIndex|)`; missing features count as 0.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSumScorer {
    motif_weight: f64,
    entropy_weight: f64,
    hilbert_weight: f64,
    stability_weight: f64,
}

impl WeightedSumScorer {
    pub const fn new(
        motif_weight: f64,
        entropy_weight: f64,
        hilbert_weight: f64,
        stability_weight: f64,
    ) -> Self {
        Self {
            motif_weight,
            entropy_weight,
            hilbert_weight,
            stability_weight,
        }
    }

    pub const fn from_config(config: &ScoringConfig) -> Self {
        Self::new(
            config.motif_weight,
            config.entropy_weight,
            config.hilbert_weight,
            config.stability_weight,
        )
    }
}

impl Default for WeightedSumScorer {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl Scorer for WeightedSumScorer {
    fn score(&self, features: &Features) -> f64 {
        let value = |v: Option<f64>| v.unwrap_or(0.0);
        self.motif_weight * value(features.motif_sum)
            + self.entropy_weight * value(features.entropy)
            + self.hilbert_weight * value(features.hilbert_mag)
            + self.stability_weight * (1.0 - value(features.boundary_transition_index).abs())
    }
}
