use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for fieldloop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Enrichment cycle policy
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Candidate extrapolation settings
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Boundary model training settings
    #[serde(default)]
    pub training: TrainingConfig,

    /// Weighted-sum scorer weights
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Score evolution analytics settings
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// File locations for the store, reference sets, and outputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PathsConfig {
    #[serde(default = "default_store_path")]
    pub store: PathBuf,

    #[serde(default = "default_known_positives_path")]
    pub known_positives: PathBuf,

    #[serde(default = "default_known_negatives_path")]
    pub known_negatives: PathBuf,

    #[serde(default = "default_calibration_path")]
    pub calibration: PathBuf,

    #[serde(default = "default_score_log_path")]
    pub score_log: PathBuf,

    #[serde(default = "default_newly_integrated_path")]
    pub newly_integrated: PathBuf,

    #[serde(default = "default_extrapolated_path")]
    pub extrapolated: PathBuf,

    #[serde(default = "default_analytics_dir")]
    pub analytics_dir: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("output/refinement/combined_with_boundary.csv")
}

fn default_known_positives_path() -> PathBuf {
    PathBuf::from("data/init/known_primes_up_to_10_million.csv")
}

fn default_known_negatives_path() -> PathBuf {
    PathBuf::from("data/init/false_elites.csv")
}

fn default_calibration_path() -> PathBuf {
    PathBuf::from("data/init/Calibration_Dataset.csv")
}

fn default_score_log_path() -> PathBuf {
    PathBuf::from("output/refinement/score_tracking_log.csv")
}

fn default_newly_integrated_path() -> PathBuf {
    PathBuf::from("output/refinement/newly_integrated_candidates.csv")
}

fn default_extrapolated_path() -> PathBuf {
    PathBuf::from("output/refinement/extrapolated_candidates.csv")
}

fn default_analytics_dir() -> PathBuf {
    PathBuf::from("output/refinement")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            store: default_store_path(),
            known_positives: default_known_positives_path(),
            known_negatives: default_known_negatives_path(),
            calibration: default_calibration_path(),
            score_log: default_score_log_path(),
            newly_integrated: default_newly_integrated_path(),
            extrapolated: default_extrapolated_path(),
            analytics_dir: default_analytics_dir(),
        }
    }
}

/// Enrichment cycle policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CycleConfig {
    /// Number of elite anchors seeding generation
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Number of candidates drawn per cycle
    #[serde(default = "default_n_samples")]
    pub n_samples: usize,

    /// Candidates must score strictly above this to survive filtering
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,

    /// Seed for anchor sampling and noise (entropy-seeded when absent)
    #[serde(default)]
    pub seed: Option<u64>,
}

const fn default_top_n() -> usize {
    100
}

const fn default_n_samples() -> usize {
    300
}

const fn default_score_threshold() -> f64 {
    0.75
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            n_samples: default_n_samples(),
            score_threshold: default_score_threshold(),
            seed: None,
        }
    }
}

/// Candidate extrapolation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GeneratorConfig {
    /// Standard deviation of the zero-mean feature noise
    #[serde(default = "default_noise_std")]
    pub noise_std: f64,

    /// Id offsets are drawn uniformly from `[-id_jitter, id_jitter]`
    #[serde(default = "default_id_jitter")]
    pub id_jitter: i64,
}

const fn default_noise_std() -> f64 {
    1.0
}

const fn default_id_jitter() -> i64 {
    100
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            noise_std: default_noise_std(),
            id_jitter: default_id_jitter(),
        }
    }
}

/// Boundary model training settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrainingConfig {
    /// Stratified holdout fraction used for the evaluation report
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,

    /// Seed for the holdout split
    #[serde(default = "default_training_seed")]
    pub seed: u64,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    #[serde(default = "default_epochs")]
    pub epochs: usize,

    /// L2 regularisation strength
    #[serde(default = "default_l2")]
    pub l2: f64,
}

const fn default_test_fraction() -> f64 {
    0.25
}

const fn default_training_seed() -> u64 {
    42
}

const fn default_learning_rate() -> f64 {
    0.1
}

const fn default_epochs() -> usize {
    500
}

const fn default_l2() -> f64 {
    0.001
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: default_test_fraction(),
            seed: default_training_seed(),
            learning_rate: default_learning_rate(),
            epochs: default_epochs(),
            l2: default_l2(),
        }
    }
}

/// Weighted-sum scorer weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScoringConfig {
    #[serde(default = "default_motif_weight")]
    pub motif_weight: f64,

    #[serde(default = "default_entropy_weight")]
    pub entropy_weight: f64,

    #[serde(default = "default_hilbert_weight")]
    pub hilbert_weight: f64,

    /// Weight of the `1 - |BoundaryTransitionIndex|` stability bonus
    #[serde(default = "default_stability_weight")]
    pub stability_weight: f64,
}

const fn default_motif_weight() -> f64 {
    0.40
}

const fn default_entropy_weight() -> f64 {
    0.25
}

const fn default_hilbert_weight() -> f64 {
    0.25
}

const fn default_stability_weight() -> f64 {
    0.10
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            motif_weight: default_motif_weight(),
            entropy_weight: default_entropy_weight(),
            hilbert_weight: default_hilbert_weight(),
            stability_weight: default_stability_weight(),
        }
    }
}

/// Score evolution analytics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnalyticsConfig {
    /// Size of the volatile and trending views
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Exclusive lower bound of the hovering band
    #[serde(default = "default_hover_low")]
    pub hover_low: f64,

    /// Exclusive upper bound of the hovering band
    #[serde(default = "default_hover_high")]
    pub hover_high: f64,
}

const fn default_top_k() -> usize {
    25
}

const fn default_hover_low() -> f64 {
    0.70
}

const fn default_hover_high() -> f64 {
    0.80
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            hover_low: default_hover_low(),
            hover_high: default_hover_high(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (stderr only when absent)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation policy for file logs: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
