//! Console logging.
//!
//! Filtered by `RUST_LOG`, warnings only by default:
//! - `RUST_LOG=debug` shows every skipped target and commit fallback
//! - `RUST_LOG=signline_kernel::commit=debug` shows the commit shim alone
//!
//! Logs go to stderr so `--json` output on stdout stays parseable.

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}
