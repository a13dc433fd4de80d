//! `tracing` subscriber setup.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Logs go to stderr; stdout is left to reports.
///
/// `RUST_LOG` takes precedence over `default_filter`. An unparseable filter
/// falls back to `info`.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Subscriber for tests: `debug` and above, captured per test.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
