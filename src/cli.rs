//! CLI argument parsing for qradar-health
//!
//! This module provides the command-line interface using clap derive macros.
//!
//! # Options
//!
//! - `--config` / `-c`: Configuration file path (default: config.yaml, env: QRADAR_HEALTH_CONFIG)
//! - `--debug`: Write DEBUG-level diagnostics to `error.log` (default: ERROR only)
//! - `--querymbean`: Only print metrics whose `metric_id` contains this substring

use clap::Parser;
use std::path::PathBuf;

/// qradar-health - Fetch QRadar internal health metrics
///
/// Queries /api/health/metrics/qradar_metrics on the configured QRadar
/// console and prints one line per metric. Diagnostics go to error.log.
#[derive(Parser, Debug)]
#[command(name = "qradar-health")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config.yaml",
        env = "QRADAR_HEALTH_CONFIG"
    )]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Filter metrics by MBean name (case-sensitive substring of metric_id)
    #[arg(long, value_name = "MBEAN")]
    pub querymbean: Option<String>,
}
