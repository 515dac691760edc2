//! Tracing setup.
//!
//! - `LOG_LEVEL` sets the filter (e.g. `debug`, or directives like
//!   `info,questionnaire=debug`).
//! - `LOG_FORMAT` selects `pretty` (default) or `json`.
//!
//! The terminal UI owns stdout, so logs are appended to a file.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Used when `LOG_LEVEL` is unset: `info`, and `debug` for this workspace.
pub const DEFAULT_FILTER: &str =
    "info,daily_questions=debug,questionnaire=debug,questionnaire_http=debug";

pub fn init_tracing(log_file: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("opening log file {}", log_file.display()))?;

    let filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().try_init(),
        _ => builder.try_init(),
    }
    .map_err(|err| anyhow!("installing tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
