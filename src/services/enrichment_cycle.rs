//! Enrichment cycle orchestration.
//!
//! One cycle runs, in order:
//! 1. Anchor selection from the loaded store
//! 2. Extrapolation, scoring/filtering and labeling
//! 3. Deduplication against the store
//! 4. Retrain + rescore (only if something merged)
//! 5. Atomic store save (revision-checked)
//! 6. Score evolution logging
//!
//! A training failure aborts before the store is written. A logging failure
//! happens after the store is written and is reported as a warning; the store
//! update is kept.

use std::sync::Arc;

use chrono::Utc;
use rand::RngCore;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::error::EnrichmentResult;
use crate::domain::models::{Candidate, CandidateStore, CycleConfig, ReferenceSets, TrainingConfig};
use crate::domain::ports::{
    CandidateGenerator, CandidateRepository, Classifier, ScoreLogRepository, Scorer,
};
use crate::services::anchor_selector::select_elite_anchors;
use crate::services::boundary_trainer::{BoundaryTrainer, TrainingSummary};
use crate::services::candidate_filter::score_and_filter;
use crate::services::merge::plan_merge;
use crate::services::score_tracker::{cycle_stamp, track_score_evolution};
use crate::services::validator::label_candidates;

/// Output of the generation half of a cycle.
#[derive(Debug, Clone, Serialize)]
pub struct Extrapolation {
    pub anchors: usize,
    pub generated: usize,
    /// Candidates that passed the score filter, labeled by reference sets
    pub labeled: Vec<Candidate>,
}

/// Counts shared by every cycle outcome.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageCounts {
    pub anchors: usize,
    pub generated: usize,
    pub passed_filter: usize,
    pub already_present: usize,
    pub batch_duplicates: usize,
}

/// Report of a cycle that merged candidates.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub cycle: String,
    pub counts: StageCounts,
    pub merged: Vec<Candidate>,
    pub store_size_before: usize,
    pub store_size_after: usize,
    pub store_revision: u64,
    pub training: TrainingSummary,
    pub log_entries_written: usize,
    /// Set when the score log could not be written; the store update stands.
    pub log_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    /// Nothing new survived; no retrain, no save, no log write.
    NoNewCandidates(StageCounts),
    Completed(Box<CycleReport>),
}

/// Runs enrichment cycles against a store and a score log
pub struct EnrichmentCycle {
    config: CycleConfig,
    trainer: BoundaryTrainer,
    store_repo: Arc<dyn CandidateRepository>,
    log_repo: Arc<dyn ScoreLogRepository>,
    scorer: Arc<dyn Scorer>,
    classifier: Arc<dyn Classifier>,
    generator: Arc<dyn CandidateGenerator>,
}

impl EnrichmentCycle {
    pub fn new(
        config: CycleConfig,
        store_repo: Arc<dyn CandidateRepository>,
        log_repo: Arc<dyn ScoreLogRepository>,
        scorer: Arc<dyn Scorer>,
        classifier: Arc<dyn Classifier>,
        generator: Arc<dyn CandidateGenerator>,
    ) -> Self {
        Self {
            config,
            trainer: BoundaryTrainer::from_config(&TrainingConfig::default()),
            store_repo,
            log_repo,
            scorer,
            classifier,
            generator,
        }
    }

    #[must_use]
    pub const fn with_trainer(mut self, trainer: BoundaryTrainer) -> Self {
        self.trainer = trainer;
        self
    }

    pub const fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Select anchors, generate, filter and label, without touching the store.
    pub fn extrapolate<R: RngCore>(
        &self,
        store: &CandidateStore,
        references: &ReferenceSets,
        rng: &mut R,
    ) -> Extrapolation {
        let anchors = select_elite_anchors(store, self.config.top_n);
        let generated = self.generator.generate(&anchors, self.config.n_samples, rng);
        let generated_count = generated.len();
        let scored = score_and_filter(generated, self.scorer.as_ref(), self.config.score_threshold);
        let labeled = label_candidates(scored, references);

        info!(
            anchors = anchors.len(),
            generated = generated_count,
            passed_filter = labeled.len(),
            positives = labeled.iter().filter(|c| c.is_prime).count(),
            "extrapolation complete"
        );

        Extrapolation {
            anchors: anchors.len(),
            generated: generated_count,
            labeled,
        }
    }

    /// Run one full cycle.
    ///
    /// # Errors
    ///
    /// Fails without writing anything if the store cannot be loaded, the
    /// updated store cannot support a binary classifier, or the save detects
    /// a concurrent writer. Score log failures do not fail the cycle.
    #[instrument(skip_all)]
    pub async fn run<R: RngCore>(
        &self,
        references: &ReferenceSets,
        rng: &mut R,
    ) -> EnrichmentResult<CycleOutcome> {
        let cycle = cycle_stamp(Utc::now());
        let previous = self.store_repo.load().await?;
        info!(
            %cycle,
            rows = previous.len(),
            revision = previous.revision(),
            "loaded candidate store"
        );

        let batch = self.extrapolate(&previous, references, rng);
        let passed_filter = batch.labeled.len();
        let plan = plan_merge(&previous, batch.labeled);

        let counts = StageCounts {
            anchors: batch.anchors,
            generated: batch.generated,
            passed_filter,
            already_present: plan.already_present,
            batch_duplicates: plan.batch_duplicates,
        };

        if plan.is_empty() {
            info!("no new candidates passed filtering, no retraining necessary");
            return Ok(CycleOutcome::NoNewCandidates(counts));
        }

        info!(new_candidates = plan.accepted.len(), "updating boundary model");
        let mut updated = plan.apply(&previous)?;
        let training = self.trainer.retrain(&mut updated, self.classifier.as_ref())?;

        let store_revision = self.store_repo.save(&updated).await?;
        info!(
            rows = updated.len(),
            revision = store_revision,
            "saved candidate store"
        );

        let entries = track_score_evolution(&previous, &updated, &cycle);
        let (log_entries_written, log_error) = match self.log_repo.append(&entries).await {
            Ok(total) => {
                info!(entries = entries.len(), total, "score evolution logged");
                (entries.len(), None)
            }
            Err(e) => {
                warn!(error = %e, "score tracking failed, store update kept");
                (0, Some(e.to_string()))
            }
        };

        Ok(CycleOutcome::Completed(Box::new(CycleReport {
            cycle,
            counts,
            store_size_before: previous.len(),
            store_size_after: updated.len(),
            merged: plan.accepted,
            store_revision,
            training,
            log_entries_written,
            log_error,
        })))
    }
}
