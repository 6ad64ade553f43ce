use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config;

/// Routes `tracing` output to `<data_dir>/deckr/deckr.log`; the terminal
/// belongs to the UI. `DECKR_LOG` overrides the configured level.
pub fn init(level: &str) -> Result<()> {
    let dir = config::data_dir();
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("deckr.log"))?;

    let filter = EnvFilter::try_from_env("DECKR_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}
