//! CSV-backed candidate store with a revision manifest.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::files::{read_optional, sibling, write_atomic, WriteLock};
use super::records::{decode_rows, encode_rows, CandidateRecord};
use crate::domain::error::{EnrichmentError, EnrichmentResult};
use crate::domain::models::{Candidate, CandidateStore};
use crate::domain::ports::CandidateRepository;

/// Sidecar written next to the store after every successful save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreManifest {
    pub revision: u64,
    pub rows: usize,
    pub updated_at: DateTime<Utc>,
}

/// Candidate store kept as one CSV file plus `<file>.meta.json`.
///
/// A store file without a manifest is treated as revision 0.
#[derive(Debug, Clone)]
pub struct CsvCandidateRepository {
    path: PathBuf,
}

impl CsvCandidateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn manifest_path(&self) -> EnrichmentResult<PathBuf> {
        sibling(&self.path, ".meta.json")
    }

    pub async fn manifest(&self) -> EnrichmentResult<Option<StoreManifest>> {
        match read_optional(&self.manifest_path()?).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CandidateRepository for CsvCandidateRepository {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> EnrichmentResult<CandidateStore> {
        let bytes = read_optional(&self.path)
            .await?
            .ok_or_else(|| EnrichmentError::StoreNotFound(self.path.clone()))?;
        let records: Vec<CandidateRecord> = decode_rows(&bytes, &self.path)?;
        let revision = self.revision().await?;

        let candidates = records.into_iter().map(Candidate::from).collect();
        let store = CandidateStore::with_revision(candidates, revision)?;
        debug!(rows = store.len(), revision, "store loaded");
        Ok(store)
    }

    async fn revision(&self) -> EnrichmentResult<u64> {
        Ok(self.manifest().await?.map_or(0, |m| m.revision))
    }

    #[instrument(skip(self, store), fields(path = %self.path.display(), rows = store.len()))]
    async fn save(&self, store: &CandidateStore) -> EnrichmentResult<u64> {
        // Held across the revision check and both renames.
        let _lock = WriteLock::acquire(&self.path).await?;
        let found = self.revision().await?;
        if found != store.revision() {
            return Err(EnrichmentError::ConcurrencyConflict {
                expected: store.revision(),
                found,
            });
        }

        let bytes = encode_rows(store.iter().map(CandidateRecord::from))?;
        write_atomic(&self.path, &bytes).await?;

        let manifest = StoreManifest {
            revision: found + 1,
            rows: store.len(),
            updated_at: Utc::now(),
        };
        write_atomic(&self.manifest_path()?, &serde_json::to_vec_pretty(&manifest)?).await?;
        debug!(revision = manifest.revision, "store saved");
        Ok(manifest.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Features;

    fn sample_store() -> CandidateStore {
        CandidateStore::new(vec![
            Candidate::new(101, Features::new(0.9, 0.8, 0.7, 0.1))
                .with_score(0.8)
                .with_boundary_score(0.9)
                .with_labels(true, false),
            Candidate::new(202, Features::new(0.1, 0.2, 0.3, 0.9))
                .with_score(0.3)
                .with_boundary_score(0.1)
                .with_labels(false, true),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_missing_store_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvCandidateRepository::new(dir.path().join("store.csv"));

        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, EnrichmentError::StoreNotFound(_)));
        assert_eq!(repo.revision().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_then_load_preserves_rows_and_bumps_revision() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvCandidateRepository::new(dir.path().join("store.csv"));

        let revision = repo.save(&sample_store()).await.unwrap();
        assert_eq!(revision, 1);

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded.revision(), 1);
        assert_eq!(loaded.candidates(), sample_store().candidates());

        let manifest = repo.manifest().await.unwrap().unwrap();
        assert_eq!(manifest.rows, 2);
    }

    #[tokio::test]
    async fn test_stale_save_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = CsvCandidateRepository::new(dir.path().join("store.csv"));
        repo.save(&sample_store()).await.unwrap();

        let first = repo.load().await.unwrap();
        let second = repo.load().await.unwrap();
        repo.save(&first).await.unwrap();

        let err = repo.save(&second).await.unwrap_err();
        assert!(matches!(
            err,
            EnrichmentError::ConcurrencyConflict { expected: 1, found: 2 }
        ));
    }

    #[tokio::test]
    async fn test_save_while_another_writer_holds_the_lock_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.csv");
        let repo = CsvCandidateRepository::new(&path);
        repo.save(&sample_store()).await.unwrap();
        let loaded = repo.load().await.unwrap();

        let lock_path = dir.path().join("store.csv.lock");
        std::fs::write(&lock_path, "4242").unwrap();

        let err = repo.save(&loaded).await.unwrap_err();
        assert!(matches!(err, EnrichmentError::StoreLocked(_)));
        assert_eq!(repo.revision().await.unwrap(), 1);
        assert!(lock_path.exists());

        std::fs::remove_file(&lock_path).unwrap();
        assert_eq!(repo.save(&loaded).await.unwrap(), 2);
        assert!(!lock_path.exists());
    }

    #[tokio::test]
    async fn test_duplicate_ids_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.csv");
        std::fs::write(&path, "Candidate,Score,IsPrime\n5,0.9,1\n5,0.8,0\n").unwrap();

        let err = CsvCandidateRepository::new(&path).load().await.unwrap_err();
        assert!(matches!(err, EnrichmentError::DuplicateCandidate(5)));
    }
}
