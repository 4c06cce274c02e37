//! The port the indexer orchestrator depends on. A single implementation
//! wraps a real alloy provider; an in-memory fake drives orchestrator and
//! reorg-handler tests without a live RPC endpoint.

use async_trait::async_trait;

use crate::domain::{BlockHeader, Log, LogFilter};
use crate::error::ChainClientResult;

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn latest_block(&self) -> ChainClientResult<u64>;

    async fn block_by_number(&self, number: u64) -> ChainClientResult<BlockHeader>;

    /// Ordered ascending by `(block_number, log_index)`.
    async fn get_logs(&self, filter: &LogFilter) -> ChainClientResult<Vec<Log>>;

    /// `latest - number + 1`, clamped to 0 when `number > latest`.
    async fn confirmations(&self, number: u64) -> ChainClientResult<u64>;

    async fn health(&self) -> ChainClientResult<()>;
}
