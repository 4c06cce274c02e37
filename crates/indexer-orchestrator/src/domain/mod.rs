pub mod config;
pub mod ingest;
pub mod known_collections;
pub mod retry;

pub use config::{
    default_required_confirmations, ChainOrchestratorConfig, DEFAULT_POLLING_INTERVAL,
    INTER_BATCH_PAUSE, MAX_BLOCK_BATCH,
};
pub use ingest::{build_raw_event, sort_logs};
pub use known_collections::KnownCollections;
pub use retry::with_retry;
