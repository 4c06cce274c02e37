//! Drives per-chain log ingestion: polls a chain client on an interval,
//! delegates reorg detection, persists raw events, and publishes confirmed
//! domain events.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    default_required_confirmations, build_raw_event, sort_logs, ChainOrchestratorConfig,
    KnownCollections, DEFAULT_POLLING_INTERVAL, INTER_BATCH_PAUSE, MAX_BLOCK_BATCH,
};
pub use error::{OrchestratorError, OrchestratorResult};
pub use ports::OrchestratorLoop;
pub use service::ChainOrchestrator;
