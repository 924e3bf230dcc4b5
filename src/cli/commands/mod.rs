//! Command implementations.
//!
//! Each command exposes clap `Args` and an `execute(args, config, json)`
//! entry point.

pub mod analyze;
pub mod bootstrap;
pub mod cycle;
pub mod extrapolate;
pub mod status;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::adapters::csv::load_reference_sets;
use crate::adapters::{CsvCandidateRepository, CsvScoreLogRepository, LogisticRegression, WeightedSumScorer};
use crate::domain::models::{Config, CycleConfig, ReferenceSets};
use crate::infrastructure::config::ConfigLoader;
use crate::services::{BoundaryTrainer, EnrichmentCycle, GaussianExtrapolator};

/// Cycle policy overrides shared by `cycle` and `extrapolate`.
#[derive(Args, Debug, Clone, Default)]
pub struct CycleOverrides {
    /// Seed for anchor sampling and noise (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of elite anchors seeding generation
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Number of candidates to generate
    #[arg(long = "samples")]
    pub n_samples: Option<usize>,

    /// Candidates must score strictly above this value
    #[arg(long)]
    pub threshold: Option<f64>,
}

impl CycleOverrides {
    /// Apply overrides to a copy of `config` and re-validate it.
    pub fn apply(&self, config: &Config) -> Result<Config> {
        let mut config = config.clone();
        let cycle: &mut CycleConfig = &mut config.cycle;
        if let Some(seed) = self.seed {
            cycle.seed = Some(seed);
        }
        if let Some(top_n) = self.top_n {
            cycle.top_n = top_n;
        }
        if let Some(n_samples) = self.n_samples {
            cycle.n_samples = n_samples;
        }
        if let Some(threshold) = self.threshold {
            cycle.score_threshold = threshold;
        }
        ConfigLoader::validate(&config).context("Invalid cycle overrides")?;
        Ok(config)
    }
}

/// Seeded generator when a seed is configured, entropy-seeded otherwise.
pub(crate) fn cycle_rng(seed: Option<u64>) -> ChaCha8Rng {
    seed.map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64)
}

pub(crate) async fn reference_sets(config: &Config) -> Result<ReferenceSets> {
    load_reference_sets(&config.paths.known_positives, &config.paths.known_negatives)
        .await
        .context("Failed to load reference sets")
}

pub(crate) fn trainer(config: &Config) -> BoundaryTrainer {
    BoundaryTrainer::from_config(&config.training)
}

/// Wire the file-backed enrichment cycle from configuration.
pub(crate) fn enrichment_cycle(config: &Config) -> Result<EnrichmentCycle> {
    let generator = GaussianExtrapolator::from_config(&config.generator)
        .context("Invalid generator configuration")?;

    Ok(EnrichmentCycle::new(
        config.cycle.clone(),
        Arc::new(CsvCandidateRepository::new(&config.paths.store)),
        Arc::new(CsvScoreLogRepository::new(&config.paths.score_log)),
        Arc::new(WeightedSumScorer::from_config(&config.scoring)),
        Arc::new(LogisticRegression::from_config(&config.training)),
        Arc::new(generator),
    )
    .with_trainer(trainer(config)))
}
