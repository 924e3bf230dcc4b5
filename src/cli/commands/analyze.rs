//! Implementation of the `fieldloop analyze` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use serde::Serialize;

use crate::adapters::csv::write_rows;
use crate::adapters::CsvScoreLogRepository;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::domain::models::Config;
use crate::domain::ports::ScoreLogRepository;
use crate::services::{CandidateTrend, TrendAnalyzer, TrendReport};

const VOLATILE_FILE: &str = "volatile_candidates.csv";
const HOVERING_FILE: &str = "hovering_candidates.csv";
const TRENDING_FILE: &str = "trending_up_candidates.csv";

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Size of the volatile and trending views (defaults to analytics.top_k)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Print the views without writing CSV files
    #[arg(long)]
    pub no_export: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeOutput {
    pub log_entries: usize,
    #[serde(flatten)]
    pub report: TrendReport,
    pub exported: Vec<PathBuf>,
    #[serde(skip)]
    pub hover_band: (f64, f64),
}

impl CommandOutput for AnalyzeOutput {
    fn to_human(&self) -> String {
        if self.log_entries == 0 {
            return "Score tracking log is empty. Run a cycle first.".to_string();
        }

        let formatter = TableFormatter::new();
        let mut lines = vec![format!(
            "Analyzed {} log entries covering {} candidate(s).",
            self.log_entries, self.report.candidates_tracked
        )];

        let sections = [
            ("Most volatile candidates (score std)".to_string(), &self.report.volatile),
            (
                format!(
                    "Candidates hovering in ({}, {})",
                    self.hover_band.0, self.hover_band.1
                ),
                &self.report.hovering,
            ),
            ("Trending upward (total score delta)".to_string(), &self.report.trending_up),
        ];
        for (title, trends) in sections {
            lines.push(String::new());
            lines.push(style(title).bold().to_string());
            if trends.is_empty() {
                lines.push("  (none)".to_string());
            } else {
                lines.push(formatter.format_trends(trends));
            }
        }

        for path in &self.exported {
            lines.push(format!("Exported {}", path.display()));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: AnalyzeArgs, config: &Config, json_mode: bool) -> Result<()> {
    let log = CsvScoreLogRepository::new(&config.paths.score_log)
        .load()
        .await
        .context("Failed to load score tracking log")?;

    let analytics = &config.analytics;
    let top_k = args.top_k.unwrap_or(analytics.top_k);
    anyhow::ensure!(top_k > 0, "--top-k must be at least 1");
    let analyzer = TrendAnalyzer::new(top_k, analytics.hover_low, analytics.hover_high);
    let report = analyzer.analyze(&log);

    let mut exported = Vec::new();
    if !args.no_export && !log.is_empty() {
        let dir = &config.paths.analytics_dir;
        for (name, rows) in [
            (VOLATILE_FILE, &report.volatile),
            (HOVERING_FILE, &report.hovering),
            (TRENDING_FILE, &report.trending_up),
        ] {
            let path = dir.join(name);
            write_rows(&path, &CandidateTrend::COLUMNS, rows)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            exported.push(path);
        }
    }

    output(
        &AnalyzeOutput {
            log_entries: log.len(),
            report,
            exported,
            hover_band: (analytics.hover_low, analytics.hover_high),
        },
        json_mode,
    );
    Ok(())
}
