//! Tracing subscriber setup
//!
//! `RUST_LOG` takes precedence over the configured level; `--verbose` raises
//! the fallback level to `debug`. Logs go to stderr so the report on stdout
//! stays clean.

use crate::config::LoggingConfig;
use std::io;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is not set
#[must_use]
pub fn default_level(config: &LoggingConfig, verbose: bool) -> &str {
    if verbose { "debug" } else { config.level.as_str() }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(config: &LoggingConfig, verbose: bool) {
    let level = default_level(config, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    let _ = if config.format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
