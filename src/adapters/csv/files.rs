//! File access helpers shared by the CSV adapters.
//!
//! Every write goes to a temporary sibling first and is renamed over the
//! target, so readers only ever see a complete old or complete new file.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::error::{EnrichmentError, EnrichmentResult};

fn storage_error(path: &Path, err: &std::io::Error) -> EnrichmentError {
    EnrichmentError::Storage(format!("{}: {err}", path.display()))
}

/// Sibling path with `suffix` appended to the file name.
pub(crate) fn sibling(path: &Path, suffix: &str) -> EnrichmentResult<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        EnrichmentError::InvalidInput(format!("{} does not name a file", path.display()))
    })?;
    let mut name = OsString::from(name);
    name.push(suffix);
    Ok(path.with_file_name(name))
}

/// Read a whole file, `None` when it does not exist.
pub(crate) async fn read_optional(path: &Path) -> EnrichmentResult<Option<Vec<u8>>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(storage_error(path, &e)),
    }
}

/// Read a whole file that must exist.
pub(crate) async fn read_required(path: &Path) -> EnrichmentResult<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| storage_error(path, &e))
}

/// Replace `path` with `bytes` via write-temp-then-rename.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> EnrichmentResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| storage_error(parent, &e))?;
    }

    let tmp_path = sibling(path, &format!(".{}.tmp", std::process::id()))?;
    if let Err(e) = tokio::fs::write(&tmp_path, bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(storage_error(&tmp_path, &e));
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(storage_error(path, &e));
    }

    debug!(path = %path.display(), bytes = bytes.len(), "file replaced");
    Ok(())
}

/// Exclusive writer lock held as `<target>.lock` until dropped.
///
/// Acquisition uses `create_new`, so exactly one writer can hold it. A lock
/// left behind by a crashed process has to be removed by hand.
#[derive(Debug)]
pub(crate) struct WriteLock {
    path: PathBuf,
}

impl WriteLock {
    pub(crate) async fn acquire(target: &Path) -> EnrichmentResult<Self> {
        let path = sibling(target, ".lock")?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, &e))?;
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(EnrichmentError::StoreLocked(path));
            }
            Err(e) => return Err(storage_error(&path, &e)),
        };
        let lock = Self { path };
        file.write_all(std::process::id().to_string().as_bytes())
            .await
            .map_err(|e| storage_error(&lock.path, &e))?;
        debug!(path = %lock.path.display(), "write lock acquired");
        Ok(lock)
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to release write lock");
        }
    }
}
