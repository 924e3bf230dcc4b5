//! Adapters implementing the domain ports.

pub mod classifier;
pub mod csv;
pub mod memory;
pub mod scoring;

pub use classifier::{LogisticModel, LogisticRegression};
pub use self::csv::{CsvCandidateRepository, CsvScoreLogRepository};
pub use memory::{InMemoryCandidateRepository, InMemoryScoreLogRepository};
pub use scoring::WeightedSumScorer;
