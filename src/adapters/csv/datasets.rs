//! Read-only inputs and derived exports.

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use super::files::{read_required, write_atomic};
use super::records::{
    decode_rows, encode_header, encode_rows, CalibrationRecord, CandidateRecord, ReferenceRecord,
};
use crate::domain::error::EnrichmentResult;
use crate::domain::models::{Candidate, ReferenceSets};

/// Read the `Candidate` id column of a reference set file.
pub async fn load_reference_ids(path: &Path) -> EnrichmentResult<Vec<i64>> {
    let bytes = read_required(path).await?;
    let rows: Vec<ReferenceRecord> = decode_rows(&bytes, path)?;
    debug!(path = %path.display(), ids = rows.len(), "reference ids loaded");
    Ok(rows.into_iter().map(|r| r.id).collect())
}

/// Load both reference sets.
pub async fn load_reference_sets(positives: &Path, negatives: &Path) -> EnrichmentResult<ReferenceSets> {
    Ok(ReferenceSets::new(
        load_reference_ids(positives).await?,
        load_reference_ids(negatives).await?,
    ))
}

/// Read calibration rows (`Number` plus feature columns) as unscored candidates.
pub async fn load_calibration(path: &Path) -> EnrichmentResult<Vec<Candidate>> {
    let bytes = read_required(path).await?;
    let rows: Vec<CalibrationRecord> = decode_rows(&bytes, path)?;
    Ok(rows.into_iter().map(Candidate::from).collect())
}

/// Write candidates in store column layout.
pub async fn write_candidates(path: &Path, candidates: &[Candidate]) -> EnrichmentResult<()> {
    let bytes = encode_rows(candidates.iter().map(CandidateRecord::from))?;
    write_atomic(path, &bytes).await
}

/// Write serializable rows under `header`.
///
/// `header` must match the serialized field names of `T`; it is what an
/// empty row set is written as.
pub async fn write_rows<T: Serialize>(path: &Path, header: &[&str], rows: &[T]) -> EnrichmentResult<()> {
    let bytes = if rows.is_empty() {
        encode_header(header)?
    } else {
        encode_rows(rows)?
    };
    write_atomic(path, &bytes).await
}
