use crate::domain::models::Features;

/// Port for heuristic candidate scoring
///
/// A stateless function over a feature record. The enrichment loop depends
/// only on this contract; the weighting formula lives in an adapter.
pub trait Scorer: Send + Sync {
    /// Compute the heuristic score for one feature record
    ///
    /// Scores are conventionally in or near `[0, 1]`. Implementations may
    /// return NaN for records they cannot score; NaN never passes filtering.
    fn score(&self, features: &Features) -> f64;
}
