pub mod anchor_selector;
pub mod bootstrap;
pub mod boundary_trainer;
pub mod candidate_filter;
pub mod enrichment_cycle;
pub mod extrapolator;
pub mod merge;
pub mod ordering;
pub mod score_tracker;
pub mod trend_analyzer;
pub mod validator;

pub use anchor_selector::select_elite_anchors;
pub use bootstrap::{select_seed_candidates, BootstrapReport, Bootstrapper, SeedSelection};
pub use boundary_trainer::{BoundaryTrainer, ClassMetrics, EvaluationReport, TrainingSummary};
pub use candidate_filter::score_and_filter;
pub use enrichment_cycle::{CycleOutcome, CycleReport, EnrichmentCycle, Extrapolation, StageCounts};
pub use extrapolator::GaussianExtrapolator;
pub use merge::{plan_merge, MergePlan};
pub use score_tracker::{cycle_stamp, track_score_evolution};
pub use trend_analyzer::{CandidateTrend, TrendAnalyzer, TrendReport};
pub use validator::label_candidates;
