//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;

use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Parser, Debug)]
#[command(name = "fieldloop")]
#[command(about = "Closed-loop candidate enrichment", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to fieldloop.yaml and fieldloop.local.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the initial store from the calibration dataset
    Bootstrap(commands::bootstrap::BootstrapArgs),

    /// Run one enrichment cycle against the store
    Cycle(commands::cycle::CycleArgs),

    /// Generate, filter and label candidates without touching the store
    Extrapolate(commands::extrapolate::ExtrapolateArgs),

    /// Aggregate the score tracking log into trend views
    Analyze(commands::analyze::AnalyzeArgs),

    /// Show store and score log status
    Status(commands::status::StatusArgs),
}

impl Cli {
    /// Load configuration from `--config` or the default hierarchy
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => ConfigLoader::load_from_file(path),
            None => ConfigLoader::load(),
        }
    }
}

/// Dispatch a parsed command
pub async fn run(command: Commands, config: &Config, json_mode: bool) -> Result<()> {
    match command {
        Commands::Bootstrap(args) => commands::bootstrap::execute(args, config, json_mode).await,
        Commands::Cycle(args) => commands::cycle::execute(args, config, json_mode).await,
        Commands::Extrapolate(args) => {
            commands::extrapolate::execute(args, config, json_mode).await
        }
        Commands::Analyze(args) => commands::analyze::execute(args, config, json_mode).await,
        Commands::Status(args) => commands::status::execute(args, config, json_mode).await,
    }
}

/// Print the error chain (or a JSON error object) and exit with status 1
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": causes,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err}", style("error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", style("caused by:").dim());
        }
    }
    std::process::exit(1)
}
