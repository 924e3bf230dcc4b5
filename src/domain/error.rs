use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the enrichment pipeline and its adapters
#[derive(Error, Debug)]
pub enum EnrichmentError {
    #[error("Boundary model needs both classes, found {found} distinct label(s)")]
    InsufficientClasses { found: usize },

    #[error("No rows with complete features are available for training")]
    EmptyTrainingSet,

    #[error("Duplicate candidate id in store: {0}")]
    DuplicateCandidate(i64),

    #[error("Candidate store not found at {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("Concurrency conflict: store was loaded at revision {expected} but is now at revision {found}")]
    ConcurrencyConflict { expected: u64, found: u64 },

    #[error("Candidate store is locked by another writer; remove {} if no cycle is running", .0.display())]
    StoreLocked(PathBuf),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

impl From<std::io::Error> for EnrichmentError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<csv::Error> for EnrichmentError {
    fn from(err: csv::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for EnrichmentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
