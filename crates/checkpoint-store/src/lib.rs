//! Per-chain checkpoint cursor and append-only reorg history.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::{InMemoryCheckpointStore, PostgresCheckpointStore};
pub use domain::{Checkpoint, ReorgHistory, SAFE_BLOCK_LAG};
pub use error::{CheckpointStoreError, CheckpointStoreResult};
pub use ports::CheckpointStore;
