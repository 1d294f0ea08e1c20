//! Startup and shutdown plumbing shared by the HTTP services.

pub mod config;
pub mod shutdown;

use tracing_subscriber::fmt::format::{Format, Pretty};
use tracing_subscriber::EnvFilter;

pub use config::ConfigError;
pub use shutdown::shutdown_signal;

/// Used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Pretty log lines with level, file and line.
pub fn log_format() -> Format<Pretty> {
    tracing_subscriber::fmt::format()
        .pretty()
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
}

/// Installs the global subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .event_format(log_format())
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .init();
}
