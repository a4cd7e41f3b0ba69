//! Log output setup
//!
//! The protocol owns stdout, so logs go to stderr or to a file. The `-d`
//! debug level picks the default filter; `RUST_LOG` overrides it.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Filter directive for a debug level `0..=9`
pub fn level_filter(debug: u8) -> &'static str {
    match debug {
        0 => "off",
        1 => "error",
        2 => "warn",
        3 | 4 => "info",
        5..=7 => "debug",
        _ => "trace",
    }
}

pub fn init_logging(debug: u8, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_filter(debug)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {:?}", path))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow!(e))
        }
        None => builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!(e)),
    }
}
