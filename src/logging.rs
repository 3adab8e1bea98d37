//! Tracing initialization for library consumers and tests.
//!
//! deepwire ships no CLI, so there is no human-facing console output to
//! colorize; callers who want structured logs install their own
//! `tracing_subscriber` as usual. This module only provides a convenience
//! initializer for tests and examples, honoring `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Install a `tracing_subscriber` that honors `RUST_LOG`, defaulting to
/// `warn` when the variable is unset. Safe to call more than once; later
/// calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
