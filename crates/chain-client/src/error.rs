//! Chain client errors.

use shared_types::{Classified, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainClientError {
    /// Requested block is ahead of the node's view of the chain.
    #[error("block {0} not found: ahead of latest known block")]
    NotFound(u64),

    /// RPC transport failure: timeout, connection refused, rate limiting.
    #[error("rpc transport error: {0}")]
    Transport(String),

    /// The breaker is open; calls fail fast without touching the network.
    #[error("circuit breaker open for endpoint, retry after cooldown")]
    BreakerOpen,

    /// Response shape didn't match what the JSON-RPC method promises.
    #[error("malformed rpc response: {0}")]
    Malformed(String),
}

impl Classified for ChainClientError {
    fn kind(&self) -> ErrorKind {
        match self {
            ChainClientError::NotFound(_) => ErrorKind::NotFound,
            ChainClientError::Transport(_) => ErrorKind::Transient,
            ChainClientError::BreakerOpen => ErrorKind::Transient,
            ChainClientError::Malformed(_) => ErrorKind::ParseError,
        }
    }
}

pub type ChainClientResult<T> = Result<T, ChainClientError>;
