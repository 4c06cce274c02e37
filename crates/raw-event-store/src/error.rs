use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RawEventStoreError {
    #[error("raw event not found: {0}")]
    NotFound(String),

    #[error("document store error: {0}")]
    Database(String),
}

impl Classified for RawEventStoreError {
    fn kind(&self) -> ErrorKind {
        match self {
            RawEventStoreError::NotFound(_) => ErrorKind::NotFound,
            RawEventStoreError::Database(_) => ErrorKind::Transient,
        }
    }
}

impl From<mongodb::error::Error> for RawEventStoreError {
    fn from(e: mongodb::error::Error) -> Self {
        RawEventStoreError::Database(e.to_string())
    }
}

pub type RawEventStoreResult<T> = Result<T, RawEventStoreError>;
