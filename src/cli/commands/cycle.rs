//! Implementation of the `fieldloop cycle` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::warn;

use super::{cycle_rng, enrichment_cycle, reference_sets, CycleOverrides};
use crate::adapters::csv::write_candidates;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::Config;
use crate::services::{CycleOutcome, StageCounts};

#[derive(Args, Debug)]
pub struct CycleArgs {
    #[command(flatten)]
    pub overrides: CycleOverrides,
}

#[derive(Debug, Serialize)]
pub struct CycleOutput {
    #[serde(flatten)]
    pub outcome: CycleOutcome,
    /// Where the merged candidates were exported, when that succeeded
    pub newly_integrated: Option<PathBuf>,
}

fn counts_lines(counts: &StageCounts) -> Vec<String> {
    vec![
        format!("  Anchors:           {}", counts.anchors),
        format!("  Generated:         {}", counts.generated),
        format!("  Passed filter:     {}", counts.passed_filter),
        format!("  Already in store:  {}", counts.already_present),
        format!("  Batch duplicates:  {}", counts.batch_duplicates),
    ]
}

impl CommandOutput for CycleOutput {
    fn to_human(&self) -> String {
        match &self.outcome {
            CycleOutcome::NoNewCandidates(counts) => {
                let mut lines =
                    vec!["No new candidates passed filtering. Store unchanged.".to_string()];
                lines.extend(counts_lines(counts));
                lines.join("\n")
            }
            CycleOutcome::Completed(report) => {
                let mut lines = vec![format!(
                    "Cycle {} merged {} candidate(s).",
                    report.cycle,
                    report.merged.len()
                )];
                lines.extend(counts_lines(&report.counts));
                lines.push(format!(
                    "  Store:             {} -> {} rows (revision {})",
                    report.store_size_before, report.store_size_after, report.store_revision
                ));
                lines.push(format!(
                    "  Trained on:        {} rows ({} excluded for missing features)",
                    report.training.trained_on, report.training.excluded_incomplete
                ));
                if let Some(eval) = &report.training.evaluation {
                    lines.push(format!(
                        "  Holdout accuracy:  {:.3} on {} rows",
                        eval.accuracy, eval.holdout_size
                    ));
                }
                match &report.log_error {
                    None => lines.push(format!(
                        "  Score log:         {} entries written",
                        report.log_entries_written
                    )),
                    Some(e) => lines.push(format!("  Score log:         NOT written ({e})")),
                }
                if let Some(path) = &self.newly_integrated {
                    lines.push(format!("  Exported to:       {}", path.display()));
                }
                lines.push(String::new());
                lines.push(TableFormatter::new().format_candidates(&report.merged));
                lines.join("\n")
            }
        }
    }
}

pub async fn execute(args: CycleArgs, config: &Config, json_mode: bool) -> Result<()> {
    let config = args.overrides.apply(config)?;
    let references = reference_sets(&config).await?;
    let cycle = enrichment_cycle(&config)?;
    let mut rng = cycle_rng(config.cycle.seed);

    let outcome = cycle
        .run(&references, &mut rng)
        .await
        .context("Enrichment cycle failed")?;

    let mut newly_integrated = None;
    if let CycleOutcome::Completed(report) = &outcome {
        let path = &config.paths.newly_integrated;
        match write_candidates(path, &report.merged).await {
            Ok(()) => newly_integrated = Some(path.clone()),
            Err(e) => warn!(error = %e, path = %path.display(), "failed to export newly integrated candidates"),
        }
    }

    output(
        &CycleOutput {
            outcome,
            newly_integrated,
        },
        json_mode,
    );
    Ok(())
}
