//! Logging initialization for the command-line tool.
//!
//! Logs go to stderr so that stdout only carries findings. `RUST_LOG`
//! overrides the level picked from the verbosity flag.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT_ONCE: Once = Once::new();

/// Default filter for a `-v` count: warnings only, then info, debug, trace.
pub fn default_filter(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("proto_compat={level}")
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    INIT_ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity))),
            )
            .init();
    });
}
