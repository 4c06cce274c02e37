use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog row corrupted: {0}")]
    Corrupted(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("publish error: {0}")]
    Publish(#[from] event_publisher::PublishError),
}

impl Classified for CatalogError {
    fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Corrupted(_) => ErrorKind::Fatal,
            CatalogError::Database(_) => ErrorKind::Transient,
            CatalogError::Publish(e) => e.kind(),
        }
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::Database(e.to_string())
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
