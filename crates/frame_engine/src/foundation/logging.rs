//! Logging setup on top of `env_logger`
//!
//! Everything in the crate logs through the `log` facade. Registration and
//! teardown events are `debug`, entity lifecycle events are `info`.

/// Initialize the logging system
///
/// Defaults to `info` unless `RUST_LOG` says otherwise.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// Initialize logging for tests, tolerating repeated calls
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
