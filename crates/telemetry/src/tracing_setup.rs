use tracing_subscriber::EnvFilter;

use crate::{TelemetryConfig, TelemetryError};

/// No-op drop target, kept so callers can hold telemetry initialization to
/// the lifetime of `main` the way a real exporter guard would require.
pub struct TracingGuard;

pub fn init_tracing(config: &TelemetryConfig) -> Result<TracingGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Config(e.to_string()))?;

    if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .try_init()
    }
    .map_err(|e| TelemetryError::Init(e.to_string()))?;

    tracing::info!(service = %config.service_name, "telemetry initialized");
    Ok(TracingGuard)
}
