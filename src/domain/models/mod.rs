pub mod candidate;
pub mod config;
pub mod reference_sets;
pub mod score_log;
pub mod store;

pub use candidate::{Candidate, FeatureRow, Features, FEATURE_COUNT, FEATURE_NAMES};
pub use config::{
    AnalyticsConfig, Config, CycleConfig, GeneratorConfig, LoggingConfig, PathsConfig,
    ScoringConfig, TrainingConfig,
};
pub use reference_sets::ReferenceSets;
pub use score_log::ScoreLogEntry;
pub use store::CandidateStore;
