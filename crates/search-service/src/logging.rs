use std::env;
use std::io;

use tracing_subscriber::EnvFilter;

/// Presence of this variable selects debug-level logging; absence selects
/// warnings only. `RUST_LOG` overrides both.
pub const DEBUG_LOG_ENV: &str = "JETBRAINS_RECENTS_LOG_DEBUG";

pub fn setup_logging() {
    let default_directives = if env::var_os(DEBUG_LOG_ENV).is_some() {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));

    // stdout carries the wire protocol, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
