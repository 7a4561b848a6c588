//! Logging setup for applications embedding gistup
//!
//! The library only emits `tracing` events; this helper installs a
//! stderr subscriber for callers that have none.

use tracing_subscriber::EnvFilter;

/// Filter for a verbosity level: 0 = warn, 1 = info, 2+ = debug
pub fn filter_for(verbosity: u8) -> EnvFilter {
    match verbosity {
        0 => EnvFilter::new("gistup=warn"),
        1 => EnvFilter::new("gistup=info"),
        _ => EnvFilter::new("gistup=debug"),
    }
}

/// Install a fmt subscriber; `RUST_LOG` takes precedence over `verbosity`
///
/// Returns false if a global subscriber was already set.
pub fn init(verbosity: u8) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(verbosity));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .is_ok()
}
