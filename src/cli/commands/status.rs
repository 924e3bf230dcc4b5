//! Implementation of the `fieldloop status` command.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::{CsvCandidateRepository, CsvScoreLogRepository};
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::error::EnrichmentError;
use crate::domain::models::{Candidate, Config};
use crate::domain::ports::{CandidateRepository, ScoreLogRepository};
use crate::services::select_elite_anchors;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of top anchors to show
    #[arg(short, long, default_value = "10")]
    pub anchors: usize,
}

#[derive(Debug, Serialize)]
pub struct StoreStatus {
    pub rows: usize,
    pub positives: usize,
    pub negatives: usize,
    pub false_elites: usize,
    pub missing_boundary_scores: usize,
    pub revision: u64,
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub store_path: PathBuf,
    /// `None` when the store has not been bootstrapped
    pub store: Option<StoreStatus>,
    pub log_entries: usize,
    pub cycles_logged: usize,
    pub last_cycle: Option<String>,
    pub top_anchors: Vec<Candidate>,
}

impl CommandOutput for StatusOutput {
    fn to_human(&self) -> String {
        let Some(store) = &self.store else {
            return format!(
                "No candidate store at {}. Run `fieldloop bootstrap` first.",
                self.store_path.display()
            );
        };

        let mut lines = vec![
            format!("Store: {} (revision {})", self.store_path.display(), store.revision),
            format!("  Rows:            {}", store.rows),
            format!(
                "  Labels:          {} positive, {} negative",
                store.positives, store.negatives
            ),
            format!("  False elites:    {}", store.false_elites),
        ];
        if store.missing_boundary_scores > 0 {
            lines.push(format!(
                "  Unscored rows:   {}",
                store.missing_boundary_scores
            ));
        }
        lines.push(format!(
            "Score log: {} entries over {} cycle(s)",
            self.log_entries, self.cycles_logged
        ));
        if let Some(cycle) = &self.last_cycle {
            lines.push(format!("  Last cycle:      {cycle}"));
        }
        if !self.top_anchors.is_empty() {
            lines.push(String::new());
            lines.push("Top anchors:".to_string());
            lines.push(TableFormatter::new().format_candidates(&self.top_anchors));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: StatusArgs, config: &Config, json_mode: bool) -> Result<()> {
    let repo = CsvCandidateRepository::new(&config.paths.store);
    let store = match repo.load().await {
        Ok(store) => Some(store),
        Err(EnrichmentError::StoreNotFound(_)) => None,
        Err(e) => return Err(e).context("Failed to load candidate store"),
    };

    let log = CsvScoreLogRepository::new(&config.paths.score_log)
        .load()
        .await
        .context("Failed to load score tracking log")?;
    let cycles: HashSet<&str> = log.iter().map(|e| e.cycle.as_str()).collect();

    let top_anchors = store
        .as_ref()
        .map(|s| select_elite_anchors(s, args.anchors))
        .unwrap_or_default();
    let store_status = store.as_ref().map(|s| {
        let (positives, negatives) = s.label_counts();
        StoreStatus {
            rows: s.len(),
            positives,
            negatives,
            false_elites: s.false_elite_count(),
            missing_boundary_scores: s.iter().filter(|c| c.boundary_score.is_none()).count(),
            revision: s.revision(),
        }
    });

    output(
        &StatusOutput {
            store_path: repo.path().to_path_buf(),
            store: store_status,
            log_entries: log.len(),
            cycles_logged: cycles.len(),
            last_cycle: log.last().map(|e| e.cycle.clone()),
            top_anchors,
        },
        json_mode,
    );
    Ok(())
}
