//! Implementation of the `fieldloop bootstrap` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::{reference_sets, trainer};
use crate::adapters::csv::load_calibration;
use crate::adapters::{CsvCandidateRepository, LogisticRegression, WeightedSumScorer};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::{BootstrapReport, Bootstrapper};

#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Replace an existing store
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct BootstrapOutput {
    pub store: PathBuf,
    #[serde(flatten)]
    pub report: BootstrapReport,
}

impl CommandOutput for BootstrapOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Initial store written to {}", self.store.display()),
            format!("  Calibration rows:    {}", self.report.calibration_rows),
            format!(
                "  Class distribution:  {} positive, {} negative",
                self.report.positives, self.report.negatives
            ),
        ];
        if self.report.unmatched_references > 0 {
            lines.push(format!(
                "  Skipped:             {} reference id(s) missing from calibration data",
                self.report.unmatched_references
            ));
        }
        if let Some(eval) = &self.report.training.evaluation {
            lines.push(format!(
                "  Holdout accuracy:    {:.3} on {} rows",
                eval.accuracy, eval.holdout_size
            ));
        }
        lines.push(format!("  Store revision:      {}", self.report.store_revision));
        lines.join("\n")
    }
}

pub async fn execute(args: BootstrapArgs, config: &Config, json_mode: bool) -> Result<()> {
    let repo = Arc::new(CsvCandidateRepository::new(&config.paths.store));
    anyhow::ensure!(
        args.force || !repo.exists(),
        "Store already exists at {}. Use --force to rebuild it.",
        repo.path().display()
    );

    let calibration = load_calibration(&config.paths.calibration)
        .await
        .context("Failed to load calibration dataset")?;
    let references = reference_sets(config).await?;

    let bootstrapper = Bootstrapper::new(
        trainer(config),
        repo.clone(),
        Arc::new(WeightedSumScorer::from_config(&config.scoring)),
        Arc::new(LogisticRegression::from_config(&config.training)),
    );
    let report = bootstrapper
        .run(calibration, &references)
        .await
        .context("Bootstrap failed")?;

    output(
        &BootstrapOutput {
            store: repo.path().to_path_buf(),
            report,
        },
        json_mode,
    );
    Ok(())
}
