//! Boundary model training and application.
//!
//! Each retrain:
//! 1. Checks the store carries both label classes (fatal otherwise)
//! 2. Drops rows with missing features from the training input only
//! 3. Holds out a stratified fraction for a report-only evaluation
//! 4. Fits a fresh model and rescores every row of the store

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::domain::error::{EnrichmentError, EnrichmentResult};
use crate::domain::models::{
    CandidateStore, FeatureRow, TrainingConfig, FEATURE_COUNT,
};
use crate::domain::ports::{BoundaryModel, Classifier};

/// Probability at or below which a holdout row is predicted negative.
const DECISION_THRESHOLD: f64 = 0.5;

/// Precision/recall for one label class on the holdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: bool,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Holdout classification report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub holdout_size: usize,
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
}

/// What one retrain did.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    /// Rows the model was fit on
    pub trained_on: usize,
    /// Rows left out of training because a feature was missing
    pub excluded_incomplete: usize,
    /// `None` when the holdout was empty
    pub evaluation: Option<EvaluationReport>,
    /// Rows whose boundary score was refreshed
    pub rows_scored: usize,
}

/// Retrains the boundary model and refreshes every row's boundary score
#[derive(Debug, Clone)]
pub struct BoundaryTrainer {
    test_fraction: f64,
    seed: u64,
}

impl BoundaryTrainer {
    pub const fn new(test_fraction: f64, seed: u64) -> Self {
        Self {
            test_fraction,
            seed,
        }
    }

    pub const fn from_config(config: &TrainingConfig) -> Self {
        Self::new(config.test_fraction, config.seed)
    }

    /// Fit a fresh model on `store` and overwrite every `BoundaryScore`.
    ///
    /// On error the store is left untouched.
    #[instrument(skip_all, fields(rows = store.len()))]
    pub fn retrain(
        &self,
        store: &mut CandidateStore,
        classifier: &dyn Classifier,
    ) -> EnrichmentResult<TrainingSummary> {
        let (positives, negatives) = store.label_counts();
        let found = usize::from(positives > 0) + usize::from(negatives > 0);
        if found < 2 {
            return Err(EnrichmentError::InsufficientClasses { found });
        }

        let (rows, labels): (Vec<FeatureRow>, Vec<bool>) = store
            .iter()
            .filter_map(|c| c.features.complete().map(|row| (row, c.is_prime)))
            .unzip();
        let excluded_incomplete = store.len() - rows.len();
        if rows.is_empty() {
            return Err(EnrichmentError::EmptyTrainingSet);
        }
        if excluded_incomplete > 0 {
            warn!(
                excluded = excluded_incomplete,
                "rows with missing features excluded from training"
            );
        }

        let found = distinct_labels(&labels);
        if found < 2 {
            return Err(EnrichmentError::InsufficientClasses { found });
        }

        let (train_idx, test_idx) = stratified_split(&labels, self.test_fraction, self.seed);
        let train_rows: Vec<FeatureRow> = train_idx.iter().map(|&i| rows[i]).collect();
        let train_labels: Vec<bool> = train_idx.iter().map(|&i| labels[i]).collect();

        let model = classifier.fit(&train_rows, &train_labels)?;

        let evaluation = if test_idx.is_empty() {
            None
        } else {
            let predicted: Vec<bool> = test_idx
                .iter()
                .map(|&i| model.predict_probability(&rows[i]) > DECISION_THRESHOLD)
                .collect();
            let actual: Vec<bool> = test_idx.iter().map(|&i| labels[i]).collect();
            Some(evaluate(&predicted, &actual))
        };

        if let Some(report) = &evaluation {
            info!(
                holdout = report.holdout_size,
                accuracy = report.accuracy,
                "boundary model holdout evaluation"
            );
            for class in &report.classes {
                info!(
                    label = class.label,
                    precision = class.precision,
                    recall = class.recall,
                    f1 = class.f1,
                    support = class.support,
                    "holdout class metrics"
                );
            }
        }

        let fill = column_means(&train_rows);
        let scores = score_all(store, model.as_ref(), &fill)?;
        for (candidate, score) in store.candidates_mut().iter_mut().zip(&scores) {
            candidate.boundary_score = Some(*score);
        }

        let summary = TrainingSummary {
            trained_on: train_rows.len(),
            excluded_incomplete,
            evaluation,
            rows_scored: scores.len(),
        };
        info!(
            trained_on = summary.trained_on,
            rows_scored = summary.rows_scored,
            "boundary model retrained"
        );
        Ok(summary)
    }
}

fn distinct_labels(labels: &[bool]) -> usize {
    usize::from(labels.iter().any(|&l| l)) + usize::from(labels.iter().any(|&l| !l))
}

/// Compute scores for every row before mutating anything.
fn score_all(
    store: &CandidateStore,
    model: &dyn BoundaryModel,
    fill: &FeatureRow,
) -> EnrichmentResult<Vec<f64>> {
    store
        .iter()
        .map(|candidate| {
            let row = impute(candidate.features.values(), fill);
            let probability = model.predict_probability(&row);
            if probability.is_nan() {
                return Err(EnrichmentError::Classifier(format!(
                    "model produced NaN for candidate {}",
                    candidate.id
                )));
            }
            Ok(probability.clamp(0.0, 1.0))
        })
        .collect()
}

fn impute(values: [Option<f64>; FEATURE_COUNT], fill: &FeatureRow) -> FeatureRow {
    let mut row = *fill;
    for (slot, value) in row.iter_mut().zip(values) {
        if let Some(v) = value.filter(|v| v.is_finite()) {
            *slot = v;
        }
    }
    row
}

fn column_means(rows: &[FeatureRow]) -> FeatureRow {
    let mut means = [0.0; FEATURE_COUNT];
    if rows.is_empty() {
        return means;
    }
    for row in rows {
        for (mean, value) in means.iter_mut().zip(row) {
            *mean += value;
        }
    }
    let n = rows.len() as f64;
    means.map(|sum| sum / n)
}

/// Split row indices into (train, test), stratified by label.
///
/// Each class contributes `round(n * test_fraction)` rows to the test side but
/// always keeps at least one training row.
pub fn stratified_split(labels: &[bool], test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [false, true] {
        let mut members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &label)| label == class)
            .map(|(i, _)| i)
            .collect();
        if members.is_empty() {
            continue;
        }
        members.shuffle(&mut rng);

        let wanted = (members.len() as f64 * test_fraction).round() as usize;
        let n_test = wanted.min(members.len() - 1);
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

/// Accuracy plus per-class precision, recall and F1.
pub fn evaluate(predicted: &[bool], actual: &[bool]) -> EvaluationReport {
    let total = actual.len();
    let correct = predicted.iter().zip(actual).filter(|(p, a)| p == a).count();

    let classes = [false, true]
        .into_iter()
        .map(|label| {
            let tp = count_pairs(predicted, actual, |p, a| p == label && a == label);
            let fp = count_pairs(predicted, actual, |p, a| p == label && a != label);
            let fn_ = count_pairs(predicted, actual, |p, a| p != label && a == label);
            let precision = ratio(tp, tp + fp);
            let recall = ratio(tp, tp + fn_);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            ClassMetrics {
                label,
                precision,
                recall,
                f1,
                support: tp + fn_,
            }
        })
        .collect();

    EvaluationReport {
        holdout_size: total,
        accuracy: ratio(correct, total),
        classes,
    }
}

fn count_pairs(predicted: &[bool], actual: &[bool], f: impl Fn(bool, bool) -> bool) -> usize {
    predicted.iter().zip(actual).filter(|(&p, &a)| f(p, a)).count()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
