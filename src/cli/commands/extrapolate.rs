//! Implementation of the `fieldloop extrapolate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::{cycle_rng, enrichment_cycle, reference_sets, CycleOverrides};
use crate::adapters::csv::write_candidates;
use crate::adapters::CsvCandidateRepository;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::{Candidate, Config};
use crate::domain::ports::CandidateRepository;

#[derive(Args, Debug)]
pub struct ExtrapolateArgs {
    #[command(flatten)]
    pub overrides: CycleOverrides,

    /// Output file (defaults to paths.extrapolated)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ExtrapolateOutput {
    pub anchors: usize,
    pub generated: usize,
    pub passed_filter: usize,
    pub positives: usize,
    pub false_elites: usize,
    pub written_to: PathBuf,
    #[serde(skip)]
    pub candidates: Vec<Candidate>,
}

impl CommandOutput for ExtrapolateOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!(
                "Extrapolated {} candidate(s) from {} anchor(s); {} passed the filter.",
                self.generated, self.anchors, self.passed_filter
            ),
            format!(
                "  Known positives: {}, false elites: {}",
                self.positives, self.false_elites
            ),
            format!("  Written to: {}", self.written_to.display()),
        ];
        if !self.candidates.is_empty() {
            lines.push(String::new());
            lines.push(TableFormatter::new().format_candidates(&self.candidates));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: ExtrapolateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let config = args.overrides.apply(config)?;
    let store = CsvCandidateRepository::new(&config.paths.store)
        .load()
        .await
        .context("Failed to load candidate store")?;
    let references = reference_sets(&config).await?;
    let cycle = enrichment_cycle(&config)?;
    let mut rng = cycle_rng(config.cycle.seed);

    let batch = cycle.extrapolate(&store, &references, &mut rng);

    let written_to = args.output.unwrap_or_else(|| config.paths.extrapolated.clone());
    write_candidates(&written_to, &batch.labeled)
        .await
        .with_context(|| format!("Failed to write {}", written_to.display()))?;

    output(
        &ExtrapolateOutput {
            anchors: batch.anchors,
            generated: batch.generated,
            passed_filter: batch.labeled.len(),
            positives: batch.labeled.iter().filter(|c| c.is_prime).count(),
            false_elites: batch.labeled.iter().filter(|c| c.is_false_elite).count(),
            written_to,
            candidates: batch.labeled,
        },
        json_mode,
    );
    Ok(())
}
