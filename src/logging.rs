//! Tracing setup for the simulator binary.
//!
//! The renderer owns the terminal, so logs go to the file named by
//! `REFLEXBIT_LOG_FILE`; without it no subscriber is installed.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `debug` or `reflexbit_core=trace`.
pub const LOG_ENV: &str = "REFLEXBIT_LOG";

/// Destination file for log output.
pub const LOG_FILE_ENV: &str = "REFLEXBIT_LOG_FILE";

pub const DEFAULT_DIRECTIVE: &str = "info";

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Install the global subscriber if a log file is configured.
///
/// Returns whether logging is active. Safe to call more than once.
pub fn init_logging() -> Result<bool> {
    let Some(path) = non_blank(std::env::var(LOG_FILE_ENV).ok()) else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path))?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(true)
}
