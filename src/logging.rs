use std::io;

use tracing_subscriber::{fmt, EnvFilter};

/// Logs go to stderr, filtered by `RUST_LOG` (default `info`), so the report printed on
/// stdout can be piped on its own.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}
