use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointStoreError {
    #[error("no checkpoint row for chain to delete")]
    NotFound,

    #[error("checkpoint corrupted: {0}")]
    Corrupted(String),

    #[error("database error: {0}")]
    Database(String),
}

impl Classified for CheckpointStoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            CheckpointStoreError::NotFound => ErrorKind::NotFound,
            CheckpointStoreError::Corrupted(_) => ErrorKind::Fatal,
            CheckpointStoreError::Database(_) => ErrorKind::Transient,
        }
    }
}

impl From<sqlx::Error> for CheckpointStoreError {
    fn from(e: sqlx::Error) -> Self {
        CheckpointStoreError::Database(e.to_string())
    }
}

pub type CheckpointStoreResult<T> = Result<T, CheckpointStoreError>;
