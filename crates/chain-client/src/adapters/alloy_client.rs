//! [`ChainClient`] backed by a real EVM JSON-RPC endpoint via `alloy`.

use alloy_primitives::B256;
use alloy_provider::{Provider, ProviderBuilder, RootProvider};
use alloy_rpc_types_eth::{BlockNumberOrTag, Filter};
use alloy_transport_http::Http;
use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::{BlockHeader, BreakerEvent, CircuitBreaker, Log, LogFilter};
use crate::error::{ChainClientError, ChainClientResult};
use crate::ports::outbound::ChainClient;

/// One instance per configured chain. Holds its own provider and breaker so a
/// misbehaving endpoint on one chain never throttles another.
pub struct AlloyChainClient {
    provider: RootProvider<Http<reqwest::Client>>,
    breaker: Mutex<CircuitBreaker>,
}

impl AlloyChainClient {
    pub fn connect(rpc_url: &str) -> ChainClientResult<Self> {
        let url = rpc_url
            .parse()
            .map_err(|e| ChainClientError::Transport(format!("invalid rpc url: {e}")))?;
        let provider = ProviderBuilder::new().on_http(url);
        Ok(Self {
            provider,
            breaker: Mutex::new(CircuitBreaker::new()),
        })
    }

    fn guard(&self) -> ChainClientResult<()> {
        let mut breaker = self.breaker.lock();
        if breaker.allow_call() {
            Ok(())
        } else {
            Err(ChainClientError::BreakerOpen)
        }
    }

    fn record<T>(&self, result: &ChainClientResult<T>) {
        let event = match result {
            Ok(_) => BreakerEvent::CallSucceeded,
            Err(ChainClientError::Transport(_)) => BreakerEvent::CallFailed,
            Err(_) => return,
        };
        self.breaker.lock().record(event);
    }
}

#[async_trait]
impl ChainClient for AlloyChainClient {
    async fn latest_block(&self) -> ChainClientResult<u64> {
        self.guard()?;
        let result = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| ChainClientError::Transport(e.to_string()));
        self.record(&result);
        result
    }

    async fn block_by_number(&self, number: u64) -> ChainClientResult<BlockHeader> {
        self.guard()?;
        let result = async {
            let block = self
                .provider
                .get_block_by_number(BlockNumberOrTag::Number(number), false.into())
                .await
                .map_err(|e| ChainClientError::Transport(e.to_string()))?
                .ok_or(ChainClientError::NotFound(number))?;

            Ok(BlockHeader {
                number: block.header.number,
                hash: block.header.hash,
                parent_hash: block.header.parent_hash,
                timestamp: block.header.timestamp,
            })
        }
        .await;
        self.record(&result);
        result
    }

    async fn get_logs(&self, filter: &LogFilter) -> ChainClientResult<Vec<Log>> {
        self.guard()?;
        let result = async {
            let mut rpc_filter = Filter::new()
                .from_block(filter.from_block)
                .to_block(filter.to_block);
            if !filter.addresses.is_empty() {
                rpc_filter = rpc_filter.address(filter.addresses.clone());
            }
            if !filter.topics.is_empty() {
                rpc_filter = rpc_filter.event_signature(filter.topics.clone());
            }

            let raw_logs = self
                .provider
                .get_logs(&rpc_filter)
                .await
                .map_err(|e| ChainClientError::Transport(e.to_string()))?;

            let mut logs = Vec::with_capacity(raw_logs.len());
            for raw in raw_logs {
                let block_number = raw.block_number.ok_or_else(|| {
                    ChainClientError::Malformed("log missing block_number".to_string())
                })?;
                let block_hash = raw
                    .block_hash
                    .ok_or_else(|| ChainClientError::Malformed("log missing block_hash".to_string()))?;
                let tx_hash = raw.transaction_hash.unwrap_or(B256::ZERO);
                let log_index = raw.log_index.ok_or_else(|| {
                    ChainClientError::Malformed("log missing log_index".to_string())
                })?;

                logs.push(Log {
                    block_number,
                    block_hash,
                    tx_hash,
                    log_index,
                    address: raw.address(),
                    topics: raw.topics().to_vec(),
                    data: raw.data().data.clone(),
                });
            }

            logs.sort_by_key(|l| (l.block_number, l.log_index));
            Ok(logs)
        }
        .await;
        self.record(&result);
        result
    }

    async fn confirmations(&self, number: u64) -> ChainClientResult<u64> {
        let latest = self.latest_block().await?;
        if number > latest {
            debug!(number, latest, "block is ahead of latest, zero confirmations");
            return Ok(0);
        }
        Ok(latest - number + 1)
    }

    async fn health(&self) -> ChainClientResult<()> {
        match self.latest_block().await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(error = %e, "chain client health check failed");
                Err(e)
            }
        }
    }
}
