//! Structured logging for simulation debugging.
//!
//! The kernel logs through `tracing` with structured fields: admission
//! decisions and collision shifts at TRACE, queue closure and construction at
//! DEBUG, run start/halt at INFO. `RUST_LOG` overrides everything, e.g.
//! `RUST_LOG=scalesim_core::queue=trace` to watch collision resolution only.

use tracing::info;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with sensible defaults (INFO and above).
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info");
}

/// Initialize logging at a specific level: `"trace"`, `"debug"`, `"info"`,
/// `"warn"` or `"error"`. The `RUST_LOG` environment variable takes
/// precedence when set. Safe to call more than once; later calls are no-ops.
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{}={level}", env!("CARGO_PKG_NAME").replace('-', "_")).into());

    let initialized = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .try_init()
        .is_ok();

    if initialized {
        info!(level = level, "simulation logging initialized");
    }
}
