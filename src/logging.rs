use crate::config::{ensure_dir, get_config_dir, LOG_FILENAME};
use crate::error::{ClientError, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Send tracing output to the log file in the config directory.
/// The terminal is owned by the view, so nothing is written to stdout.
pub fn init_logging() -> Result<PathBuf> {
    init_logging_in(&get_config_dir())
}

pub fn init_logging_in(dir: &Path) -> Result<PathBuf> {
    ensure_dir(dir)?;
    let path = dir.join(LOG_FILENAME);
    let log_file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Arc::new(log_file))
        .try_init()
        .map_err(|e| ClientError::Other(format!("Failed to initialize logging: {}", e)))?;

    Ok(path)
}
