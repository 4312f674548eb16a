#![allow(dead_code)]

pub mod app;
pub mod service;

/// Route engine debug events to the test writer
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("triage_core=debug")
        .with_test_writer()
        .try_init();
}
