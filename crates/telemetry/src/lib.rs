//! Structured logging bootstrap for the indexer binary: a
//! `tracing_subscriber::fmt` subscriber composed with an `EnvFilter` driven
//! by `LOG_LEVEL`. Every crate logs through the `tracing` facade directly;
//! this crate only owns process-wide subscriber installation.

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::TracingGuard;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("invalid telemetry configuration: {0}")]
    Config(String),
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
}

/// Installs the global subscriber. Call once, at process start, before any
/// other crate logs. Returns a guard with no drop behavior today, kept so
/// call sites already hold telemetry init to `main`'s lifetime the way a
/// future exporter would require.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TracingGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)
}
