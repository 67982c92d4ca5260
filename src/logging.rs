//! Tracing setup. Logs go to a file only; the terminal belongs to the UI.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the `-v` derived log filter.
pub const LOG_ENV: &str = "STAGETREE_LOG";

/// Default directive for a given `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "stagetree=info",
        1 => "stagetree=debug",
        _ => "stagetree=trace",
    }
}

/// Install a file-backed subscriber. Without a log file nothing is installed.
pub fn init(log_file: Option<&Path>, verbose: u8) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("{}: failed to open log file", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;
    Ok(())
}
