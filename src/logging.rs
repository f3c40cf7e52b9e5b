// src/logging.rs

//! Log filter selection for the `siteplan` binary.
//!
//! `--log-level` wins and applies to everything. Without it, `SITEPLAN_LOG`
//! is read as a full `EnvFilter` directive list, so
//! `SITEPLAN_LOG=siteplan::schedule=trace,info` narrows tracing to the
//! auto-scheduler. A missing or malformed value falls back to `info`.
//!
//! Output goes to stderr so command results on stdout stay pipeable.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "SITEPLAN_LOG";

const FALLBACK_DIRECTIVE: &str = "info";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(cli_level, std::env::var(LOG_ENV).ok()))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<String>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(directive(level));
    }
    env.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_DIRECTIVE))
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
