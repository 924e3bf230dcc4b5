//! Row types and codecs for the tabular files.

use std::path::Path;

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::{EnrichmentError, EnrichmentResult};
use crate::domain::models::{Candidate, Features};

/// One row of the candidate store and of candidate exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CandidateRecord {
    #[serde(rename = "Candidate")]
    pub id: i64,
    #[serde(rename = "MotifSum", default)]
    pub motif_sum: Option<f64>,
    #[serde(rename = "Entropy", default)]
    pub entropy: Option<f64>,
    #[serde(rename = "HilbertMag", default)]
    pub hilbert_mag: Option<f64>,
    #[serde(rename = "BoundaryTransitionIndex", default)]
    pub boundary_transition_index: Option<f64>,
    #[serde(rename = "Score", default)]
    pub score: Option<f64>,
    #[serde(rename = "BoundaryScore", default)]
    pub boundary_score: Option<f64>,
    #[serde(
        rename = "IsPrime",
        default,
        serialize_with = "write_flag",
        deserialize_with = "read_flag"
    )]
    pub is_prime: bool,
    #[serde(
        rename = "IsFalseElite",
        default,
        serialize_with = "write_flag",
        deserialize_with = "read_flag"
    )]
    pub is_false_elite: bool,
}

impl From<&Candidate> for CandidateRecord {
    fn from(c: &Candidate) -> Self {
        Self {
            id: c.id,
            motif_sum: c.features.motif_sum,
            entropy: c.features.entropy,
            hilbert_mag: c.features.hilbert_mag,
            boundary_transition_index: c.features.boundary_transition_index,
            score: Some(c.score).filter(|s| !s.is_nan()),
            boundary_score: c.boundary_score,
            is_prime: c.is_prime,
            is_false_elite: c.is_false_elite,
        }
    }
}

impl From<CandidateRecord> for Candidate {
    fn from(r: CandidateRecord) -> Self {
        let features = Features {
            motif_sum: r.motif_sum,
            entropy: r.entropy,
            hilbert_mag: r.hilbert_mag,
            boundary_transition_index: r.boundary_transition_index,
        };
        Self {
            id: r.id,
            features,
            score: r.score.unwrap_or(f64::NAN),
            boundary_score: r.boundary_score,
            is_prime: r.is_prime,
            is_false_elite: r.is_false_elite,
        }
    }
}

/// Calibration rows are keyed by `Number` instead of `Candidate`.
#[derive(Debug, Deserialize)]
pub(crate) struct CalibrationRecord {
    #[serde(rename = "Number")]
    pub number: i64,
    #[serde(rename = "MotifSum", default)]
    pub motif_sum: Option<f64>,
    #[serde(rename = "Entropy", default)]
    pub entropy: Option<f64>,
    #[serde(rename = "HilbertMag", default)]
    pub hilbert_mag: Option<f64>,
    #[serde(rename = "BoundaryTransitionIndex", default)]
    pub boundary_transition_index: Option<f64>,
}

impl From<CalibrationRecord> for Candidate {
    fn from(r: CalibrationRecord) -> Self {
        Self::new(
            r.number,
            Features {
                motif_sum: r.motif_sum,
                entropy: r.entropy,
                hilbert_mag: r.hilbert_mag,
                boundary_transition_index: r.boundary_transition_index,
            },
        )
    }
}

/// Reference set files only need their id column.
#[derive(Debug, Deserialize)]
pub(crate) struct ReferenceRecord {
    #[serde(rename = "Candidate")]
    pub id: i64,
}

/// Parse a boolean cell: `1`/`0`, `1.0`/`0.0` or `true`/`false` in any case.
/// An empty cell is false.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    match trimmed {
        "" | "0" | "0.0" => Some(false),
        "1" | "1.0" => Some(true),
        _ if trimmed.eq_ignore_ascii_case("true") => Some(true),
        _ if trimmed.eq_ignore_ascii_case("false") => Some(false),
        _ => None,
    }
}

fn read_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid flag value '{raw}'")))
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn write_flag<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

/// Decode every row of a CSV buffer, naming `source` in errors.
pub(crate) fn decode_rows<T: DeserializeOwned>(bytes: &[u8], source: &Path) -> EnrichmentResult<Vec<T>> {
    let mut reader = csv::Reader::from_reader(bytes);
    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| {
            row.map_err(|e| {
                EnrichmentError::Serialization(format!(
                    "{} row {}: {e}",
                    source.display(),
                    i + 1
                ))
            })
        })
        .collect()
}

/// Encode rows with a header line.
pub(crate) fn encode_rows<T: Serialize>(rows: impl IntoIterator<Item = T>) -> EnrichmentResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| EnrichmentError::Serialization(e.to_string()))
}

/// Encode only a header line, for row sets that are empty.
pub(crate) fn encode_header(header: &[&str]) -> EnrichmentResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header)?;
    writer
        .into_inner()
        .map_err(|e| EnrichmentError::Serialization(e.to_string()))
}
