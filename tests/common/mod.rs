//! Common test utilities for integration tests
//!
//! Provides shared fixtures, stub ports, and helpers used across multiple
//! integration test files.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fieldloop::domain::error::EnrichmentResult;
use fieldloop::domain::models::{Candidate, CycleConfig, FeatureRow, Features};
use fieldloop::domain::ports::{BoundaryModel, CandidateGenerator, Classifier, Scorer};
use rand::RngCore;
use tempfile::TempDir;

/// Create a temporary directory for test isolation
///
/// Returns a TempDir that will be cleaned up when dropped.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Known positive 101 and known false elite 202, both already scored.
pub fn seed_store_rows() -> Vec<Candidate> {
    vec![
        Candidate::new(101, Features::new(0.9, 0.7, 0.6, 0.1))
            .with_score(0.8)
            .with_boundary_score(0.9)
            .with_labels(true, false),
        Candidate::new(202, Features::new(0.2, 0.3, 0.4, 0.8))
            .with_score(0.3)
            .with_boundary_score(0.1)
            .with_labels(false, true),
    ]
}

/// Cycle settings that let every stub candidate through.
pub fn cycle_config() -> CycleConfig {
    CycleConfig {
        top_n: 10,
        n_samples: 1,
        score_threshold: 0.75,
        seed: Some(7),
    }
}

/// Scores every record at 0.78.
pub struct FixedScorer;

impl Scorer for FixedScorer {
    fn score(&self, _features: &Features) -> f64 {
        0.78
    }
}

/// Predicts 0.5 for every row.
pub struct ConstantModel;

impl BoundaryModel for ConstantModel {
    fn predict_probability(&self, _features: &FeatureRow) -> f64 {
        0.5
    }
}

/// Fits a [`ConstantModel`] regardless of the training data.
pub struct ConstantClassifier;

impl Classifier for ConstantClassifier {
    fn fit(
        &self,
        features: &[FeatureRow],
        labels: &[bool],
    ) -> EnrichmentResult<Box<dyn BoundaryModel>> {
        assert_eq!(features.len(), labels.len());
        Ok(Box::new(ConstantModel))
    }
}

/// Emits the same candidates on every call, ignoring anchors and the RNG.
pub struct FixedGenerator {
    pub candidates: Vec<Candidate>,
}

impl FixedGenerator {
    /// One candidate, id 555, near candidate 101.
    pub fn single() -> Self {
        Self {
            candidates: vec![Candidate::new(555, Features::new(0.85, 0.65, 0.55, 0.15))],
        }
    }
}

impl CandidateGenerator for FixedGenerator {
    fn generate(
        &self,
        _anchors: &[Candidate],
        _n_samples: usize,
        _rng: &mut dyn RngCore,
    ) -> Vec<Candidate> {
        self.candidates.clone()
    }
}

pub fn stub_ports() -> (Arc<FixedScorer>, Arc<ConstantClassifier>, Arc<FixedGenerator>) {
    (
        Arc::new(FixedScorer),
        Arc::new(ConstantClassifier),
        Arc::new(FixedGenerator::single()),
    )
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture");
    path
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
