//! Initial store construction from the calibration dataset.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::error::{EnrichmentError, EnrichmentResult};
use crate::domain::models::{Candidate, CandidateStore, ReferenceSets};
use crate::domain::ports::{CandidateRepository, Classifier, Scorer};
use crate::services::boundary_trainer::{BoundaryTrainer, TrainingSummary};

/// Calibration rows matched against the reference sets.
#[derive(Debug, Clone, Default)]
pub struct SeedSelection {
    pub candidates: Vec<Candidate>,
    pub positives: usize,
    pub negatives: usize,
    /// Reference ids that have no calibration row
    pub unmatched_references: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    pub calibration_rows: usize,
    pub positives: usize,
    pub negatives: usize,
    pub unmatched_references: usize,
    pub store_revision: u64,
    pub training: TrainingSummary,
}

/// Score and label the calibration rows that belong to a reference set.
///
/// Rows keep calibration file order. An id in both reference sets is taken
/// as positive. Repeated calibration ids keep their first row.
pub fn select_seed_candidates(
    calibration: Vec<Candidate>,
    references: &ReferenceSets,
    scorer: &dyn Scorer,
) -> SeedSelection {
    let mut seen = HashSet::new();
    let mut selection = SeedSelection::default();

    for row in calibration {
        let positive = references.is_positive(row.id);
        let negative = references.is_false_elite(row.id);
        if !(positive || negative) || !seen.insert(row.id) {
            continue;
        }

        let score = scorer.score(&row.features);
        let labeled = if positive {
            selection.positives += 1;
            row.with_labels(true, negative)
        } else {
            selection.negatives += 1;
            row.with_labels(false, true)
        };
        selection.candidates.push(labeled.with_score(score));
    }

    selection.unmatched_references = references
        .positives
        .union(&references.negatives)
        .filter(|id| !seen.contains(id))
        .count();
    selection
}

/// Builds the first store from calibration data
pub struct Bootstrapper {
    trainer: BoundaryTrainer,
    store_repo: Arc<dyn CandidateRepository>,
    scorer: Arc<dyn Scorer>,
    classifier: Arc<dyn Classifier>,
}

impl Bootstrapper {
    pub fn new(
        trainer: BoundaryTrainer,
        store_repo: Arc<dyn CandidateRepository>,
        scorer: Arc<dyn Scorer>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            trainer,
            store_repo,
            scorer,
            classifier,
        }
    }

    /// Score, label, train and persist the initial store.
    ///
    /// # Errors
    ///
    /// `InsufficientClasses` when the matched rows do not cover both labels;
    /// nothing is written in that case.
    #[instrument(skip_all)]
    pub async fn run(
        &self,
        calibration: Vec<Candidate>,
        references: &ReferenceSets,
    ) -> EnrichmentResult<BootstrapReport> {
        let calibration_rows = calibration.len();
        let selection = select_seed_candidates(calibration, references, self.scorer.as_ref());

        info!(
            positives = selection.positives,
            negatives = selection.negatives,
            "training set class distribution"
        );
        if selection.positives == 0 {
            warn!("no known positives found in the calibration dataset");
        }
        if selection.negatives == 0 {
            warn!("no known false elites found in the calibration dataset");
        }
        if selection.unmatched_references > 0 {
            warn!(
                unmatched = selection.unmatched_references,
                "reference ids without a calibration row were skipped"
            );
        }

        let found = usize::from(selection.positives > 0) + usize::from(selection.negatives > 0);
        if found < 2 {
            return Err(EnrichmentError::InsufficientClasses { found });
        }

        let revision = self.store_repo.revision().await?;
        let mut store = CandidateStore::with_revision(selection.candidates, revision)?;
        let training = self.trainer.retrain(&mut store, self.classifier.as_ref())?;
        let store_revision = self.store_repo.save(&store).await?;
        info!(rows = store.len(), revision = store_revision, "initial store written");

        Ok(BootstrapReport {
            calibration_rows,
            positives: selection.positives,
            negatives: selection.negatives,
            unmatched_references: selection.unmatched_references,
            store_revision,
            training,
        })
    }
}
