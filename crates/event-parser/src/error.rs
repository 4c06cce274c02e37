use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected} topics, got {actual}")]
    WrongTopicCount { expected: usize, actual: usize },

    #[error("data too short: expected at least {expected} bytes, got {actual}")]
    DataTooShort { expected: usize, actual: usize },

    #[error("ABI offset {offset} out of range for payload of {len} bytes")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("array length mismatch: ids has {ids}, values has {values}")]
    LengthMismatch { ids: usize, values: usize },

    #[error("log signature {0} does not match any known event")]
    UnknownSignature(String),

    #[error("malformed ABI payload: {0}")]
    Malformed(String),
}

impl Classified for ParseError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::ParseError
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
