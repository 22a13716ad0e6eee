//! qradar-health library
//!
//! This crate provides the core functionality for fetching QRadar internal
//! health metrics, filtering them by MBean name and printing them, with
//! diagnostics written to a log file.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;

pub use fetcher::{fetch_and_print, FetchOutcome};
pub use logging::Logger;
