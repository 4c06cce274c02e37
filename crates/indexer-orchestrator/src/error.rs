use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    ChainClient(#[from] chain_client::ChainClientError),

    #[error(transparent)]
    CheckpointStore(#[from] checkpoint_store::CheckpointStoreError),

    #[error(transparent)]
    RawEventStore(#[from] raw_event_store::RawEventStoreError),

    #[error(transparent)]
    Reorg(#[from] reorg_handler::ReorgError),

    #[error(transparent)]
    Publish(#[from] event_publisher::PublishError),

    #[error("shutdown deadline exceeded waiting for chain {chain_id} to stop")]
    ShutdownDeadlineExceeded { chain_id: String },
}

impl Classified for OrchestratorError {
    fn kind(&self) -> ErrorKind {
        match self {
            OrchestratorError::ChainClient(e) => e.kind(),
            OrchestratorError::CheckpointStore(e) => e.kind(),
            OrchestratorError::RawEventStore(e) => e.kind(),
            OrchestratorError::Reorg(e) => e.kind(),
            OrchestratorError::Publish(e) => e.kind(),
            OrchestratorError::ShutdownDeadlineExceeded { .. } => ErrorKind::Fatal,
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
