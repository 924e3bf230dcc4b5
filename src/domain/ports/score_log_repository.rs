use async_trait::async_trait;

use crate::domain::error::EnrichmentResult;
use crate::domain::models::ScoreLogEntry;

/// Repository trait for the append-only score tracking log
#[async_trait]
pub trait ScoreLogRepository: Send + Sync {
    /// Load every logged entry in write order (empty when no log exists)
    async fn load(&self) -> EnrichmentResult<Vec<ScoreLogEntry>>;

    /// Append one cycle's entries after the existing ones
    ///
    /// Returns the total number of entries in the log afterwards.
    async fn append(&self, entries: &[ScoreLogEntry]) -> EnrichmentResult<usize>;
}
