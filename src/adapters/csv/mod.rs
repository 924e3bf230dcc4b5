//! CSV file adapters for the store, the score log and the input datasets.

pub mod candidate_repository;
pub mod datasets;
pub mod files;
mod records;
pub mod score_log_repository;

pub use candidate_repository::{CsvCandidateRepository, StoreManifest};
pub use datasets::{
    load_calibration, load_reference_ids, load_reference_sets, write_candidates, write_rows,
};
pub use files::write_atomic;
pub use score_log_repository::CsvScoreLogRepository;
