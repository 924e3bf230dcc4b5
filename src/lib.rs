//! Fieldloop - closed-loop candidate enrichment
//!
//! Fieldloop maintains a growing labeled table of candidates described by
//! structural feature vectors. Each enrichment cycle synthesizes new
//! candidates near the best known positives, keeps the ones that score above
//! a threshold, labels them against reference sets, merges the new ids into
//! the store, retrains the boundary classifier and logs how every existing
//! candidate's scores moved.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the capability ports
//! - **Service Layer** (`services`): one module per pipeline stage plus the
//!   cycle orchestrator
//! - **Adapters** (`adapters`): CSV and in-memory repositories, the default
//!   scorer and classifier
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fieldloop::adapters::*;
//! use fieldloop::services::{EnrichmentCycle, GaussianExtrapolator};
//!
//! let cycle = EnrichmentCycle::new(
//!     config.cycle.clone(),
//!     Arc::new(CsvCandidateRepository::new("store.csv")),
//!     Arc::new(CsvScoreLogRepository::new("score_log.csv")),
//!     Arc::new(WeightedSumScorer::default()),
//!     Arc::new(LogisticRegression::default()),
//!     Arc::new(GaussianExtrapolator::new(1.0, 100)?),
//! );
//! let outcome = cycle.run(&references, &mut rng).await?;
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{Candidate, CandidateStore, Config, Features, ReferenceSets, ScoreLogEntry};
pub use domain::ports::{
    BoundaryModel, CandidateGenerator, CandidateRepository, Classifier, ScoreLogRepository, Scorer,
};
pub use domain::{EnrichmentError, EnrichmentResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{CycleOutcome, EnrichmentCycle};
