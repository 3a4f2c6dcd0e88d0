//! CLI command implementations

pub mod account;
pub mod action;
pub mod balance;
pub mod logs;
pub mod status;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use usdd_core::{EntryPoint, LogEvent, LoggingService, UsddContext};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Data directory from USDD_DIR, or ~/.usdd
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("USDD_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".usdd"))
        .ok_or_else(|| anyhow!("Could not find home directory; set USDD_DIR"))
}

/// Open the ledger context for the data directory
pub fn get_context() -> Result<UsddContext> {
    let data_dir = get_data_dir()?;
    UsddContext::new(&data_dir).context("Failed to initialize ledger context")
}
