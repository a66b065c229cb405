//! Diagnostic output on stderr.
//!
//! The library only emits `tracing` events. Nothing is printed unless a binary
//! or the preload constructor calls [`init`].

use tracing_subscriber::EnvFilter;

/// Filter directives for the preloaded shim, e.g. `V4L2_HDR_SHIM_LOG=debug`.
pub const SHIM_LOG_ENV: &str = "V4L2_HDR_SHIM_LOG";

/// Installs a stderr subscriber filtered by `env_var`, or by `default_directive`
/// when that variable is unset or invalid. Does nothing if a global subscriber
/// already exists.
pub fn init(env_var: &str, default_directive: &str) {
    let filter =
        EnvFilter::try_from_env(env_var).unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
