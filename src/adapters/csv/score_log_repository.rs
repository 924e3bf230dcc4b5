use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::instrument;

use super::files::{read_optional, write_atomic};
use super::records::{decode_rows, encode_rows};
use crate::domain::error::EnrichmentResult;
use crate::domain::models::ScoreLogEntry;
use crate::domain::ports::ScoreLogRepository;

/// Score tracking log stored as a single CSV file.
///
/// Appends read the existing file, concatenate and atomically rewrite it.
#[derive(Debug, Clone)]
pub struct CsvScoreLogRepository {
    path: PathBuf,
}

impl CsvScoreLogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ScoreLogRepository for CsvScoreLogRepository {
    async fn load(&self) -> EnrichmentResult<Vec<ScoreLogEntry>> {
        match read_optional(&self.path).await? {
            Some(bytes) => decode_rows(&bytes, &self.path),
            None => Ok(Vec::new()),
        }
    }

    #[instrument(skip(self, entries), fields(path = %self.path.display(), new = entries.len()))]
    async fn append(&self, entries: &[ScoreLogEntry]) -> EnrichmentResult<usize> {
        let mut log = self.load().await?;
        log.extend_from_slice(entries);
        write_atomic(&self.path, &encode_rows(&log)?).await?;
        Ok(log.len())
    }
}
