use std::env;

/// What to name the service in log output and how verbose to be.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// Passed to `EnvFilter`; anything it accepts works (`info`,
    /// `debug,chain_client=trace`, ...).
    pub log_level: String,
    /// JSON lines instead of the human-readable format, for container log
    /// collection.
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "marketplace-indexer".to_string(),
            log_level: "info".to_string(),
            json: false,
        }
    }
}

impl TelemetryConfig {
    /// `LOG_LEVEL` (falls back to `RUST_LOG`, then `info`), `SERVICE_NAME`,
    /// `LOG_FORMAT=json` to switch to structured output.
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "marketplace-indexer".to_string()),
            log_level: env::var("LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json: env::var("LOG_FORMAT").map(|v| v.eq_ignore_ascii_case("json")).unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_plain_text_info() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, "info");
        assert!(!config.json);
    }
}
