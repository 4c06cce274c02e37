use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReorgError {
    #[error("reorg depth {affected_blocks} exceeds maximum {max_depth}, operator intervention required")]
    TooDeep {
        affected_blocks: u64,
        max_depth: u64,
    },

    #[error("common ancestor search found no shared block in range [{from}, {to}]")]
    AncestorNotFound { from: u64, to: u64 },

    #[error("batch continuity violated at block {block_number}: {reason}")]
    DiscontinuousBatch { block_number: u64, reason: String },

    #[error("chain client error: {0}")]
    ChainClient(#[from] chain_client::ChainClientError),

    #[error("checkpoint store error: {0}")]
    CheckpointStore(#[from] checkpoint_store::CheckpointStoreError),

    #[error("raw event store error: {0}")]
    RawEventStore(#[from] raw_event_store::RawEventStoreError),
}

impl Classified for ReorgError {
    fn kind(&self) -> ErrorKind {
        match self {
            ReorgError::TooDeep { .. } => ErrorKind::Fatal,
            ReorgError::AncestorNotFound { .. } => ErrorKind::Fatal,
            ReorgError::DiscontinuousBatch { .. } => ErrorKind::Validation,
            ReorgError::ChainClient(e) => e.kind(),
            ReorgError::CheckpointStore(e) => e.kind(),
            ReorgError::RawEventStore(e) => e.kind(),
        }
    }
}

pub type ReorgResult<T> = Result<T, ReorgError>;
