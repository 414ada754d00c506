//! Console logging for the `snowgen` binary.
//!
//! Identifiers go to stdout, so every log line is written to stderr. The
//! verbosity follows `RUST_LOG` and defaults to `info`:
//!
//! ```bash
//! RUST_LOG=snowgen=trace snowgen --count 4
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global `tracing` subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_target(false),
        )
        .try_init()?;
    Ok(())
}
