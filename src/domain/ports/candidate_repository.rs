use async_trait::async_trait;

use crate::domain::error::EnrichmentResult;
use crate::domain::models::CandidateStore;

/// Repository trait for the candidate store
///
/// The store is read whole at cycle start and replaced whole at cycle end.
/// Implementations must make the replacement atomic and must refuse it when
/// the persisted revision moved since the store was loaded.
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    /// Load the full store, tagged with its persisted revision
    ///
    /// # Errors
    /// Returns error if:
    /// - The store does not exist
    /// - The store contains duplicate ids
    /// - Reading or parsing fails
    async fn load(&self) -> EnrichmentResult<CandidateStore>;

    /// Current persisted revision (0 when nothing has been saved)
    async fn revision(&self) -> EnrichmentResult<u64>;

    /// Replace the persisted store with `store`
    ///
    /// Compares `store.revision()` with the persisted revision first.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - The new persisted revision
    /// * `Err(ConcurrencyConflict)` - Another writer saved in between; nothing was written
    async fn save(&self, store: &CandidateStore) -> EnrichmentResult<u64>;
}
