//! A scripted fake [`ChainClient`] for orchestrator and reorg-handler tests.
//! No network, no breaker games: callers preload the chain they want to see.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{BlockHeader, Log, LogFilter};
use crate::error::{ChainClientError, ChainClientResult};
use crate::ports::outbound::ChainClient;

#[derive(Default)]
pub struct InMemoryChainClient {
    blocks: RwLock<Vec<BlockHeader>>,
    logs: RwLock<Vec<Log>>,
}

impl InMemoryChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_block(&self, header: BlockHeader) {
        self.blocks.write().push(header);
    }

    pub fn push_log(&self, log: Log) {
        self.logs.write().push(log);
    }

    pub fn replace_block(&self, header: BlockHeader) {
        let mut blocks = self.blocks.write();
        if let Some(existing) = blocks.iter_mut().find(|b| b.number == header.number) {
            *existing = header;
        } else {
            blocks.push(header);
        }
    }
}

#[async_trait]
impl ChainClient for InMemoryChainClient {
    async fn latest_block(&self) -> ChainClientResult<u64> {
        self.blocks
            .read()
            .iter()
            .map(|b| b.number)
            .max()
            .ok_or(ChainClientError::NotFound(0))
    }

    async fn block_by_number(&self, number: u64) -> ChainClientResult<BlockHeader> {
        self.blocks
            .read()
            .iter()
            .find(|b| b.number == number)
            .copied()
            .ok_or(ChainClientError::NotFound(number))
    }

    async fn get_logs(&self, filter: &LogFilter) -> ChainClientResult<Vec<Log>> {
        let mut matched: Vec<Log> = self
            .logs
            .read()
            .iter()
            .filter(|l| l.block_number >= filter.from_block && l.block_number <= filter.to_block)
            .filter(|l| filter.addresses.is_empty() || filter.addresses.contains(&l.address))
            .filter(|l| {
                filter.topics.is_empty()
                    || l.topics.first().map(|t| filter.topics.contains(t)).unwrap_or(false)
            })
            .cloned()
            .collect();
        matched.sort_by_key(|l| (l.block_number, l.log_index));
        Ok(matched)
    }

    async fn confirmations(&self, number: u64) -> ChainClientResult<u64> {
        let latest = self.latest_block().await.unwrap_or(0);
        if number > latest {
            return Ok(0);
        }
        Ok(latest - number + 1)
    }

    async fn health(&self) -> ChainClientResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    #[tokio::test]
    async fn reports_latest_as_max_pushed_block() {
        let client = InMemoryChainClient::new();
        client.push_block(BlockHeader {
            number: 10,
            hash: B256::ZERO,
            parent_hash: B256::ZERO,
            timestamp: 0,
        });
        client.push_block(BlockHeader {
            number: 11,
            hash: B256::repeat_byte(1),
            parent_hash: B256::ZERO,
            timestamp: 1,
        });
        assert_eq!(client.latest_block().await.unwrap(), 11);
    }

    #[tokio::test]
    async fn missing_block_is_not_found() {
        let client = InMemoryChainClient::new();
        assert!(matches!(
            client.block_by_number(5).await,
            Err(ChainClientError::NotFound(5))
        ));
    }
}
