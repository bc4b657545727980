//! Fixtures shared by the integration suites.

#![allow(dead_code)]

pub mod adapter;
pub mod foo;

/// Installs a `tracing` subscriber honoring `RUST_LOG`, once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
