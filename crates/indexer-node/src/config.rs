//! Per-component configuration, loaded with plain `std::env::var` reads and
//! the documented defaults. No CLI framework, secret manager integration, or
//! hot reload: some concrete loader has to exist for the binary to run, and
//! this is it.

use std::time::Duration;

use alloy_primitives::Address;
use shared_types::ChainId;

use crate::error::{NodeError, NodeResult};

/// Fixed by the shutdown protocol, not configurable.
pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(30);

/// One entry per chain the node ingests, discovered through the `CHAINS`
/// env var (a comma-separated list of prefixes) and resolved through
/// `{PREFIX}_CHAIN_ID`, `{PREFIX}_RPC`, `{PREFIX}_FACTORY`, and the optional
/// `{PREFIX}_CONFIRMATIONS` override.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub chain_id: ChainId,
    pub rpc_url: String,
    pub factory_address: Address,
    pub confirmations_override: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub log_level: String,
    pub mongo_uri: String,
    pub mongo_database: String,
    pub postgres_dsn: String,
    pub rabbitmq_url: String,
    pub polling_interval_seconds: u64,
    pub heartbeat_interval_seconds: u64,
    pub media_storage_root: String,
    pub pinning_endpoint: String,
    pub chains: Vec<ChainConfig>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> NodeResult<Self> {
        let environment = env_or("ENVIRONMENT", "development");
        let log_level = env_or("LOG_LEVEL", "info");

        let mongo_uri = env_or("MONGO_URI", "mongodb://localhost:27017");
        let mongo_database = env_or("MONGO_DATABASE", "marketplace_indexer");

        let postgres_dsn = format!(
            "postgres://{user}:{password}@{host}:{port}/{database}?sslmode={ssl_mode}",
            user = env_or("POSTGRES_USER", "postgres"),
            password = env_or("POSTGRES_PASSWORD", "postgres"),
            host = env_or("POSTGRES_HOST", "localhost"),
            port = env_or("POSTGRES_PORT", "5432"),
            database = env_or("POSTGRES_DATABASE", "marketplace_indexer"),
            ssl_mode = env_or("POSTGRES_SSL_MODE", "prefer"),
        );

        let rabbitmq_url = format!(
            "amqp://{user}:{password}@{host}:{port}/{vhost}",
            user = env_or("RABBITMQ_USER", "guest"),
            password = env_or("RABBITMQ_PASSWORD", "guest"),
            host = env_or("RABBITMQ_HOST", "localhost"),
            port = env_or("RABBITMQ_PORT", "5672"),
            vhost = env_or("RABBITMQ_VHOST", "%2f"),
        );

        let polling_interval_seconds = env_or("POLLING_INTERVAL_SECONDS", "5")
            .parse()
            .map_err(|_| NodeError::Config("POLLING_INTERVAL_SECONDS is not a valid integer".to_string()))?;

        let heartbeat_interval_seconds = env_or("HEARTBEAT_INTERVAL_SECONDS", "30")
            .parse()
            .map_err(|_| NodeError::Config("HEARTBEAT_INTERVAL_SECONDS is not a valid integer".to_string()))?;

        let media_storage_root = env_or("MEDIA_STORAGE_ROOT", "./data/media");
        let pinning_endpoint = env_or("PINNING_ENDPOINT", "http://localhost:5001/api/v0/pin");

        let chains = Self::chains_from_env()?;
        if chains.is_empty() {
            return Err(NodeError::Config("CHAINS must name at least one chain prefix".to_string()));
        }

        Ok(Self {
            environment,
            log_level,
            mongo_uri,
            mongo_database,
            postgres_dsn,
            rabbitmq_url,
            polling_interval_seconds,
            heartbeat_interval_seconds,
            media_storage_root,
            pinning_endpoint,
            chains,
        })
    }

    fn chains_from_env() -> NodeResult<Vec<ChainConfig>> {
        let prefixes = std::env::var("CHAINS").unwrap_or_default();
        prefixes
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Self::chain_from_prefix)
            .collect()
    }

    fn chain_from_prefix(prefix: &str) -> NodeResult<ChainConfig> {
        let chain_id_raw = std::env::var(format!("{prefix}_CHAIN_ID"))
            .map_err(|_| NodeError::Config(format!("missing {prefix}_CHAIN_ID")))?;
        let chain_id = ChainId::parse(chain_id_raw)
            .map_err(|e| NodeError::Config(format!("{prefix}_CHAIN_ID: {e}")))?;

        let rpc_url = std::env::var(format!("{prefix}_RPC"))
            .map_err(|_| NodeError::Config(format!("missing {prefix}_RPC")))?;

        let factory_raw = std::env::var(format!("{prefix}_FACTORY"))
            .map_err(|_| NodeError::Config(format!("missing {prefix}_FACTORY")))?;
        let factory_address: Address = factory_raw
            .parse()
            .map_err(|e| NodeError::Config(format!("{prefix}_FACTORY: {e}")))?;

        let confirmations_override = match std::env::var(format!("{prefix}_CONFIRMATIONS")) {
            Ok(raw) => Some(
                raw.parse()
                    .map_err(|_| NodeError::Config(format!("{prefix}_CONFIRMATIONS is not a valid integer")))?,
            ),
            Err(_) => None,
        };

        Ok(ChainConfig { chain_id, rpc_url, factory_address, confirmations_override })
    }
}
