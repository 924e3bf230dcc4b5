//! Candidate extrapolation.
//!
//! Synthesizes new candidates by perturbing elite anchors:
//! 1. Pick an anchor uniformly at random (with replacement)
//! 2. Add zero-mean Gaussian noise to every present feature
//! 3. Shift the id by a uniform offset in `[-id_jitter, id_jitter]`

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use tracing::{debug, warn};

use crate::domain::error::{EnrichmentError, EnrichmentResult};
use crate::domain::models::{Candidate, GeneratorConfig};
use crate::domain::ports::CandidateGenerator;

/// Gaussian perturbation generator
#[derive(Debug, Clone)]
pub struct GaussianExtrapolator {
    noise: Normal<f64>,
    id_jitter: i64,
}

impl GaussianExtrapolator {
    pub fn new(noise_std: f64, id_jitter: i64) -> EnrichmentResult<Self> {
        if id_jitter < 0 {
            return Err(EnrichmentError::InvalidInput(format!(
                "id_jitter must be non-negative, got {id_jitter}"
            )));
        }
        if !(noise_std.is_finite() && noise_std >= 0.0) {
            return Err(EnrichmentError::InvalidInput(format!(
                "noise_std must be finite and non-negative, got {noise_std}"
            )));
        }
        let noise = Normal::new(0.0, noise_std).map_err(|e| {
            EnrichmentError::InvalidInput(format!("invalid noise_std {noise_std}: {e}"))
        })?;
        Ok(Self { noise, id_jitter })
    }

    pub fn from_config(config: &GeneratorConfig) -> EnrichmentResult<Self> {
        Self::new(config.noise_std, config.id_jitter)
    }
}

impl CandidateGenerator for GaussianExtrapolator {
    fn generate(
        &self,
        anchors: &[Candidate],
        n_samples: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Candidate> {
        if anchors.is_empty() {
            if n_samples > 0 {
                warn!(n_samples, "no elite anchors available, nothing to extrapolate");
            }
            return Vec::new();
        }

        let mut generated = Vec::with_capacity(n_samples);
        for _ in 0..n_samples {
            let base = &anchors[rng.gen_range(0..anchors.len())];
            let features = base
                .features
                .map_present(|value| value + self.noise.sample(&mut *rng));
            let offset = rng.gen_range(-self.id_jitter..=self.id_jitter);
            generated.push(Candidate::new(base.id.saturating_add(offset), features));
        }

        debug!(
            anchors = anchors.len(),
            generated = generated.len(),
            "extrapolated candidates"
        );
        generated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Features;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn anchor(id: i64) -> Candidate {
        Candidate::new(id, Features::new(0.9, 0.8, 0.7, 0.1))
            .with_score(0.8)
            .with_boundary_score(0.9)
            .with_labels(true, false)
    }

    #[test]
    fn test_generates_requested_count_near_anchors() {
        let generator = GaussianExtrapolator::new(1.0, 100).expect("valid generator");
        let anchors = vec![anchor(1_000), anchor(5_000)];
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let generated = generator.generate(&anchors, 200, &mut rng);

        assert_eq!(generated.len(), 200);
        for candidate in &generated {
            let near_first = (candidate.id - 1_000).abs() <= 100;
            let near_second = (candidate.id - 5_000).abs() <= 100;
            assert!(near_first || near_second, "id {} too far", candidate.id);
            assert!(candidate.score.is_nan());
            assert!(!candidate.is_prime);
            assert!(candidate.features.complete().is_some());
        }
    }

    #[test]
    fn test_same_seed_reproduces_batch() {
        let generator = GaussianExtrapolator::new(1.0, 100).expect("valid generator");
        let anchors = vec![anchor(10), anchor(20), anchor(30)];

        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);

        // Unscored candidates carry a NaN score, so compare what was drawn.
        let drawn = |batch: Vec<Candidate>| -> Vec<(i64, Features)> {
            batch.into_iter().map(|c| (c.id, c.features)).collect()
        };
        let a = drawn(generator.generate(&anchors, 50, &mut rng_a));
        let b = drawn(generator.generate(&anchors, 50, &mut rng_b));
        assert_eq!(a.len(), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_noise_and_jitter_copies_anchor() {
        let generator = GaussianExtrapolator::new(0.0, 0).expect("valid generator");
        let anchors = vec![anchor(77)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let generated = generator.generate(&anchors, 3, &mut rng);
        for candidate in generated {
            assert_eq!(candidate.id, 77);
            assert_eq!(candidate.features, anchors[0].features);
        }
    }

    #[test]
    fn test_missing_features_stay_missing() {
        let generator = GaussianExtrapolator::new(1.0, 100).expect("valid generator");
        let mut sparse = anchor(5);
        sparse.features.entropy = None;
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let generated = generator.generate(&[sparse], 10, &mut rng);
        assert!(generated.iter().all(|c| c.features.entropy.is_none()));
        assert!(generated.iter().all(|c| c.features.motif_sum.is_some()));
    }

    #[test]
    fn test_empty_anchor_set_yields_nothing() {
        let generator = GaussianExtrapolator::new(1.0, 100).expect("valid generator");
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(generator.generate(&[], 10, &mut rng).is_empty());
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        for noise_std in [-1.0, -f64::MIN_POSITIVE, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(
                    GaussianExtrapolator::new(noise_std, 10),
                    Err(EnrichmentError::InvalidInput(_))
                ),
                "noise_std {noise_std} should be rejected"
            );
        }
        assert!(matches!(
            GaussianExtrapolator::new(1.0, -1),
            Err(EnrichmentError::InvalidInput(_))
        ));
    }
}
