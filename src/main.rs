//! qradar-health - QRadar health metrics fetcher
//!
//! Reads connection details from the configuration file, fetches
//! `/api/health/metrics/qradar_metrics` once and prints the result.
//! Fetch failures are logged to `error.log` and never change the exit code.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error};

use qradar_health::{cli::Cli, config::Config, fetcher, logging::Logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let logger = Logger::setup(cli.debug)?;

    logger.in_scope(|| {
        debug!(
            version = env!("CARGO_PKG_VERSION"),
            config = %cli.config.display(),
            "Starting qradar-health"
        )
    });

    // Load configuration
    let config = Config::load(&cli.config)
        .inspect_err(|e| logger.in_scope(|| error!(error = %e, "Failed to load configuration")))
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;

    let mut stdout = std::io::stdout().lock();
    let outcome =
        fetcher::fetch_and_print(&logger, &config, cli.querymbean.as_deref(), &mut stdout).await;

    logger.in_scope(|| debug!(?outcome, "Finished"));

    Ok(())
}
