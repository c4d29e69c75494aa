//! Tracing bootstrap for binaries and tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber.
///
/// Reads `RUST_LOG` when set, otherwise defaults to debug-level output for
/// the engine crates. Safe to call once per process; subsequent calls are
/// ignored rather than panicking so test binaries can share it.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hawala=debug".into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
