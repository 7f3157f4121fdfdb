//! Development-time tracing for the instance table.
//!
//! Diagnostics go to stderr and never into the assessment document or the
//! rendered table. Events are emitted under the `instance_table` target:
//! - `error`: a step reached column assembly with colliding column keys.
//! - `warn`: a table was built without a selected step.
//! - `info`: the store persisted a change (with the changed instance keys).
//! - `debug`: every dispatched command and skipped no-op update.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=instance_table=debug cargo run -- render --doc a.json --test headings --step headingFunction
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
