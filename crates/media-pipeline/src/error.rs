use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("upload of {size_bytes} bytes exceeds the {cap} byte cap for this category")]
    TooLarge { size_bytes: u64, cap: u64 },

    #[error("declared dimension {0} is outside [1, 10000]")]
    InvalidDimensions(u32),

    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("document store error: {0}")]
    Database(String),

    #[error("object storage error: {0}")]
    Storage(String),

    #[error("pinning request failed: {0}")]
    Pinning(String),
}

impl Classified for MediaError {
    fn kind(&self) -> ErrorKind {
        match self {
            MediaError::UnsupportedContentType(_)
            | MediaError::TooLarge { .. }
            | MediaError::InvalidDimensions(_) => ErrorKind::Validation,
            MediaError::NotFound(_) => ErrorKind::NotFound,
            MediaError::Database(_) | MediaError::Storage(_) | MediaError::Pinning(_) => ErrorKind::Transient,
        }
    }
}

impl From<mongodb::error::Error> for MediaError {
    fn from(e: mongodb::error::Error) -> Self {
        MediaError::Database(e.to_string())
    }
}

pub type MediaResult<T> = Result<T, MediaError>;
