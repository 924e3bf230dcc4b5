//! In-memory repositories.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::error::{EnrichmentError, EnrichmentResult};
use crate::domain::models::{Candidate, CandidateStore, ScoreLogEntry};
use crate::domain::ports::{CandidateRepository, ScoreLogRepository};

/// Candidate store held in memory with the same revision rules as on disk.
#[derive(Debug, Default)]
pub struct InMemoryCandidateRepository {
    state: RwLock<Option<(Vec<Candidate>, u64)>>,
}

impl InMemoryCandidateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `candidates` already persisted at revision 0.
    pub fn seeded(candidates: Vec<Candidate>) -> Self {
        Self {
            state: RwLock::new(Some((candidates, 0))),
        }
    }

    pub async fn snapshot(&self) -> Option<Vec<Candidate>> {
        self.state.read().await.as_ref().map(|(rows, _)| rows.clone())
    }
}

#[async_trait]
impl CandidateRepository for InMemoryCandidateRepository {
    async fn load(&self) -> EnrichmentResult<CandidateStore> {
        let guard = self.state.read().await;
        let (rows, revision) = guard
            .as_ref()
            .ok_or_else(|| EnrichmentError::StoreNotFound("<memory>".into()))?;
        CandidateStore::with_revision(rows.clone(), *revision)
    }

    async fn revision(&self) -> EnrichmentResult<u64> {
        Ok(self.state.read().await.as_ref().map_or(0, |(_, r)| *r))
    }

    async fn save(&self, store: &CandidateStore) -> EnrichmentResult<u64> {
        let mut guard = self.state.write().await;
        let found = guard.as_ref().map_or(0, |(_, r)| *r);
        if found != store.revision() {
            return Err(EnrichmentError::ConcurrencyConflict {
                expected: store.revision(),
                found,
            });
        }
        *guard = Some((store.candidates().to_vec(), found + 1));
        Ok(found + 1)
    }
}

/// Score log held in memory. Appends can be made to fail for testing the
/// non-fatal logging path.
#[derive(Debug, Default)]
pub struct InMemoryScoreLogRepository {
    entries: RwLock<Vec<ScoreLogEntry>>,
    fail_appends: AtomicBool,
}

impl InMemoryScoreLogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ScoreLogRepository for InMemoryScoreLogRepository {
    async fn load(&self) -> EnrichmentResult<Vec<ScoreLogEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn append(&self, entries: &[ScoreLogEntry]) -> EnrichmentResult<usize> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(EnrichmentError::Storage("score log unavailable".to_string()));
        }
        let mut log = self.entries.write().await;
        log.extend_from_slice(entries);
        Ok(log.len())
    }
}
