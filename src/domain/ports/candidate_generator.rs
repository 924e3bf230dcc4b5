use rand::RngCore;

use crate::domain::models::Candidate;

/// Port for synthesizing new candidates near known anchors
///
/// The randomness source is always passed in so that cycles can be replayed
/// from a seed.
pub trait CandidateGenerator: Send + Sync {
    /// Draw `n_samples` ephemeral candidates from `anchors`
    ///
    /// Returned candidates are unscored and unlabeled. No deduplication is
    /// performed, so two draws may share an id.
    fn generate(
        &self,
        anchors: &[Candidate],
        n_samples: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<Candidate>;
}
