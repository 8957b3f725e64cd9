//! Logging setup for the CLI.
//!
//! Diagnostics go to stderr through `tracing-subscriber` so they never mix
//! with command output on stdout.

use anyhow::{Context, Result};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "MEMFS_LOG";

/// Default filter when neither the flag nor the environment sets one.
const DEFAULT_FILTER: &str = "warn";

/// Build the filter: `--log-level` > `MEMFS_LOG` > [`DEFAULT_FILTER`].
pub fn build_filter(cli_level: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {}", level));
    }

    match std::env::var(LOG_ENV) {
        Ok(value) if !value.is_empty() => EnvFilter::try_new(&value)
            .with_context(|| format!("Invalid {} value: {}", LOG_ENV, value)),
        _ => Ok(EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Install the global subscriber.
pub fn init_logging(cli_level: Option<&str>) -> Result<()> {
    let filter = build_filter(cli_level)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_level_wins() {
        assert!(build_filter(Some("debug")).is_ok());
        assert!(build_filter(Some("memfs_core=trace,warn")).is_ok());
    }

    #[test]
    fn test_invalid_cli_level() {
        assert!(build_filter(Some("memfs_core=notalevel")).is_err());
    }
}
