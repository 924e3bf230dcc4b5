//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that adapters must implement:
//! - Scorer: heuristic scoring of feature records
//! - Classifier / BoundaryModel: the learned boundary model
//! - CandidateGenerator: synthesis of new candidates from anchors
//! - CandidateRepository: persistence of the candidate store
//! - ScoreLogRepository: persistence of the score tracking log
//!
//! The enrichment loop depends only on these contracts.

pub mod candidate_generator;
pub mod candidate_repository;
pub mod classifier;
pub mod score_log_repository;
pub mod scorer;

pub use candidate_generator::CandidateGenerator;
pub use candidate_repository::CandidateRepository;
pub use classifier::{BoundaryModel, Classifier};
pub use score_log_repository::ScoreLogRepository;
pub use scorer::Scorer;
