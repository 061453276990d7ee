//! `tracing` subscriber bootstrap for applications embedding the vault.
//!
//! The library itself only emits events; installing a subscriber is the
//! application's call. [`init_logging`] is the default way to do it.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter.
pub const LOG_ENV_VAR: &str = "LIFELOG_LOG";

/// File name prefix of the daily log files (`lifelog.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "lifelog.log";

/// Build the filter: `LIFELOG_LOG` if set and valid, else `default_filter`,
/// else `info`.
fn build_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global `tracing` subscriber.
///
/// With `log_dir`, events go to a daily-rolling file in that directory
/// through a non-blocking writer; the returned guard flushes it on drop
/// and must be kept alive for the lifetime of the application. Without
/// `log_dir`, events go to stderr and no guard is returned.
///
/// Calling this again once a subscriber is installed is a no-op.
#[must_use = "dropping the guard stops file logging"]
pub fn init_logging(log_dir: Option<&Path>, default_filter: &str) -> Option<WorkerGuard> {
    let filter = build_filter(default_filter);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init()
                .ok()
                .map(|()| guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}
