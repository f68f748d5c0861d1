//! Responsible for logging search statistics in `PREFIX name=value` form.

use std::fmt::Display;
use std::sync::OnceLock;

static STATISTIC_PREFIX: OnceLock<&'static str> = OnceLock::new();

/// Enables statistic logging with the given line prefix. Takes effect at most
/// once per process; later calls are ignored.
pub fn configure_statistic_logging(prefix: &'static str) {
    let _ = STATISTIC_PREFIX.set(prefix);
}

pub fn should_log_statistics() -> bool {
    STATISTIC_PREFIX.get().is_some()
}

/// Emits a single statistic through the `log` facade, if logging is
/// configured.
pub fn log_statistic(name: impl Display, value: impl Display) {
    if let Some(prefix) = STATISTIC_PREFIX.get() {
        log::info!("{prefix} {name}={value}");
    }
}
