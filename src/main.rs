//! Sceneline CLI
//!
//! Detects scene boundaries in long videos by splitting them into fixed
//! windows, sending each window to a visual-inference service and merging
//! the per-window answers into one project timeline.
//!
//! # Usage
//!
//! ```bash
//! sceneline project create --name "interview" --duration 1830
//! sceneline analyze --project <id> --chunks ./chunks --mode parallel
//! sceneline progress --project <id>
//! sceneline scenes --project <id>
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use sceneline::cli::{commands, Cli};
use sceneline::config_initialization::initialize_configuration;
use sceneline::utils::logging::init_logging;

/// Main entry point for the Sceneline CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let (config, sources) = initialize_configuration(&cli)?;
    init_logging(&config.log_level, config.log_json)?;
    sources.log();

    info!("Starting Sceneline");

    // Execute the requested command
    if let Err(e) = commands::execute(cli.command, &config).await {
        error!("Command failed: {:#}", e);
        return Err(e);
    }

    info!("Sceneline completed successfully");
    Ok(())
}
