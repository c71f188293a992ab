//! Tracing initialization for the TICK binaries.
//!
//! Process-level diagnostics (startup, shutdown, background-worker
//! failures) go through `tracing`; the hot-path audit trail uses
//! [`crate::logger`] instead. Filtering respects `RUST_LOG`
//! (e.g. `RUST_LOG=tick_core=debug`).

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// # Panics
///
/// Panics if the global subscriber has already been set.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
