//! Property-based tests for the enrichment stages.

use std::collections::HashSet;

use fieldloop::domain::models::{Candidate, CandidateStore, Features};
use fieldloop::domain::ports::CandidateGenerator;
use fieldloop::services::{
    plan_merge, score_and_filter, select_elite_anchors, track_score_evolution,
    GaussianExtrapolator,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn candidate(id: i64, score: f64, boundary: Option<f64>, is_prime: bool) -> Candidate {
    let mut c = Candidate::new(id, Features::new(0.5, 0.5, 0.5, 0.1))
        .with_score(score)
        .with_labels(is_prime, !is_prime);
    c.boundary_score = boundary;
    c
}

/// Rows with unique ids drawn from `0..500`.
fn store_rows() -> impl Strategy<Value = Vec<Candidate>> {
    prop::collection::hash_set(0_i64..500, 0..40).prop_flat_map(|ids| {
        let ids: Vec<i64> = ids.into_iter().collect();
        let n = ids.len();
        (
            Just(ids),
            prop::collection::vec(0.0_f64..1.0, n),
            prop::collection::vec(prop::option::of(0.0_f64..1.0), n),
            prop::collection::vec(any::<bool>(), n),
        )
            .prop_map(|(ids, scores, boundaries, primes)| {
                ids.into_iter()
                    .zip(scores)
                    .zip(boundaries)
                    .zip(primes)
                    .map(|(((id, s), b), p)| candidate(id, s, b, p))
                    .collect()
            })
    })
}

/// Fixed score used by [`score_and_filter`] in these properties.
struct MotifScorer;

impl fieldloop::domain::ports::Scorer for MotifScorer {
    fn score(&self, features: &Features) -> f64 {
        features.motif_sum.unwrap_or(f64::NAN)
    }
}

proptest! {
    /// Property: merging yields unique ids and grows the store by exactly the
    /// number of accepted candidates.
    #[test]
    fn prop_merge_keeps_ids_unique(
        rows in store_rows(),
        batch_ids in prop::collection::vec(0_i64..800, 0..60),
    ) {
        let store = CandidateStore::new(rows).expect("unique ids");
        let batch: Vec<Candidate> = batch_ids
            .iter()
            .map(|&id| candidate(id, 0.9, None, false))
            .collect();

        let plan = plan_merge(&store, batch);
        let merged = plan.apply(&store).expect("merge should keep ids unique");

        prop_assert_eq!(merged.len(), store.len() + plan.accepted.len());
        prop_assert_eq!(
            plan.accepted.len() + plan.already_present + plan.batch_duplicates,
            batch_ids.len()
        );
        let ids: HashSet<i64> = merged.iter().map(|c| c.id).collect();
        prop_assert_eq!(ids.len(), merged.len());

        let expected_new: HashSet<i64> = batch_ids
            .iter()
            .copied()
            .filter(|id| !store.contains(*id))
            .collect();
        let accepted: HashSet<i64> = plan.accepted.iter().map(|c| c.id).collect();
        prop_assert_eq!(accepted, expected_new);
    }

    /// Property: anchors are positives only, at most `top_n`, ranked by
    /// score then boundary score.
    #[test]
    fn prop_anchor_ranking(rows in store_rows(), top_n in 0usize..20) {
        let store = CandidateStore::new(rows).expect("unique ids");
        let anchors = select_elite_anchors(&store, top_n);
        let positives = store.iter().filter(|c| c.is_prime).count();

        prop_assert_eq!(anchors.len(), top_n.min(positives));
        prop_assert!(anchors.iter().all(|c| c.is_prime));
        for pair in anchors.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score.total_cmp(&pair[1].score).is_eq() {
                let a = pair[0].boundary_score.unwrap_or(f64::NEG_INFINITY);
                let b = pair[1].boundary_score.unwrap_or(f64::NEG_INFINITY);
                prop_assert!(a >= b);
            }
        }
    }

    /// Property: the filter keeps exactly the candidates scoring strictly
    /// above the threshold, in input order.
    #[test]
    fn prop_filter_is_strict(
        motifs in prop::collection::vec(0.0_f64..1.0, 0..50),
        threshold in 0.0_f64..1.0,
    ) {
        let batch: Vec<Candidate> = motifs
            .iter()
            .enumerate()
            .map(|(i, &m)| Candidate::new(i as i64, Features::new(m, 0.0, 0.0, 0.0)))
            .collect();

        let kept = score_and_filter(batch, &MotifScorer, threshold);
        let expected: Vec<i64> = motifs
            .iter()
            .enumerate()
            .filter(|(_, &m)| m > threshold)
            .map(|(i, _)| i as i64)
            .collect();

        prop_assert_eq!(kept.iter().map(|c| c.id).collect::<Vec<_>>(), expected);
        prop_assert!(kept.iter().all(|c| c.score > threshold));
    }

    /// Property: tracking logs every surviving id once with current minus
    /// previous deltas.
    #[test]
    fn prop_tracker_deltas(rows in store_rows(), shift in -0.5_f64..0.5) {
        let previous = CandidateStore::new(rows.clone()).expect("unique ids");
        let current_rows: Vec<Candidate> = rows
            .into_iter()
            .map(|mut c| {
                c.boundary_score = Some(c.boundary_score.unwrap_or(0.0) + shift);
                c
            })
            .collect();
        let current = CandidateStore::new(current_rows).expect("unique ids");

        let entries = track_score_evolution(&previous, &current, "cycle");

        prop_assert_eq!(entries.len(), previous.len());
        for (entry, prev) in entries.iter().zip(previous.iter()) {
            prop_assert_eq!(entry.candidate, prev.id);
            prop_assert!(entry.delta_score.abs() < 1e-12);
            match prev.boundary_score {
                Some(_) => {
                    let delta = entry.delta_boundary.expect("both sides present");
                    prop_assert!((delta - shift).abs() < 1e-9);
                }
                None => prop_assert!(entry.delta_boundary.is_none()),
            }
        }
    }

    /// Property: generated ids stay within the jitter window of some anchor
    /// and every sample is accounted for.
    #[test]
    fn prop_extrapolated_ids_within_jitter(
        anchor_ids in prop::collection::hash_set(1_000_i64..2_000, 1..5),
        jitter in 0_i64..25,
        n_samples in 0usize..100,
        seed in any::<u64>(),
    ) {
        let anchors: Vec<Candidate> = anchor_ids
            .iter()
            .map(|&id| candidate(id, 0.9, Some(0.9), true))
            .collect();
        let generator = GaussianExtrapolator::new(0.1, jitter).expect("valid generator");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let generated = generator.generate(&anchors, n_samples, &mut rng);

        prop_assert_eq!(generated.len(), n_samples);
        for c in &generated {
            prop_assert!(anchor_ids.iter().any(|&a| (c.id - a).abs() <= jitter));
            prop_assert!(c.score.is_nan());
            prop_assert!(c.boundary_score.is_none());
        }
    }
}
