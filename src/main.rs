//! Fieldloop CLI entry point.

use clap::Parser;

use fieldloop::cli::{handle_error, run, Cli};
use fieldloop::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(err) => handle_error(&err, cli.json),
    };

    let _logger = match LoggerImpl::init(&LogConfig::from(&config.logging)) {
        Ok(logger) => logger,
        Err(err) => handle_error(&err, cli.json),
    };

    if let Err(err) = run(cli.command, &config, cli.json).await {
        handle_error(&err, cli.json);
    }
}
