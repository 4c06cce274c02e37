use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use chain_client::{BlockHeader, ChainClient};
use checkpoint_store::{Checkpoint, CheckpointStore, ReorgHistory, SAFE_BLOCK_LAG};
use raw_event_store::RawEventStore;
use shared_types::event::ReorgNotification;
use shared_types::ChainId;

use crate::domain::{assert_contiguous, Advance, ReorgOutcome, Reorged, MAX_REORG_DEPTH};
use crate::error::{ReorgError, ReorgResult};
use crate::ports::inbound::ReorgApi;

/// Reorg detection and compensation, driven once per orchestrator tick.
///
/// Ancestor identification never consults a dedicated `blocks` table: it asks
/// the chain client for the block at a candidate height and checks whether
/// the raw event store has ever recorded that exact `(number, hash)` pair.
pub struct ReorgHandlerService<C, K, R>
where
    C: ChainClient,
    K: CheckpointStore,
    R: RawEventStore,
{
    chain_client: Arc<C>,
    checkpoint_store: Arc<K>,
    raw_event_store: Arc<R>,
}

impl<C, K, R> ReorgHandlerService<C, K, R>
where
    C: ChainClient,
    K: CheckpointStore,
    R: RawEventStore,
{
    pub fn new(chain_client: Arc<C>, checkpoint_store: Arc<K>, raw_event_store: Arc<R>) -> Self {
        Self {
            chain_client,
            checkpoint_store,
            raw_event_store,
        }
    }

    async fn matches_stored(&self, chain_id: &ChainId, height: u64) -> ReorgResult<bool> {
        let header = self.chain_client.block_by_number(height).await?;
        Ok(self
            .raw_event_store
            .has_block(chain_id, height, &header.hash.to_string())
            .await?)
    }

    /// Binary search `[lo, hi]` for the highest height where the chain
    /// client's current block matches what the raw event store recorded.
    /// `None` means not even `lo` matches: the fork is deeper than the
    /// search window.
    async fn find_common_ancestor(
        &self,
        chain_id: &ChainId,
        lo: u64,
        hi: u64,
    ) -> ReorgResult<Option<u64>> {
        if !self.matches_stored(chain_id, lo).await? {
            return Ok(None);
        }

        let mut lo = lo;
        let mut hi = hi;
        while lo < hi {
            let mid = lo + (hi - lo + 1) / 2;
            if self.matches_stored(chain_id, mid).await? {
                lo = mid;
            } else {
                hi = mid - 1;
            }
        }
        Ok(Some(lo))
    }

    /// Computes what a straight advance to `head` would look like, without
    /// writing it anywhere — the caller has not processed the batch's logs
    /// yet. See [`ReorgApi::commit_advance`].
    async fn compute_advance(&self, head: &BlockHeader) -> ReorgResult<Advance> {
        let new_safe_block = head.number.checked_sub(SAFE_BLOCK_LAG).filter(|&b| b > 0);
        let new_safe_hash = match new_safe_block {
            Some(number) => Some(self.chain_client.block_by_number(number).await?.hash.to_string()),
            None => None,
        };

        Ok(Advance {
            new_block: head.number,
            new_hash: head.hash.to_string(),
            new_safe_block,
            new_safe_hash,
        })
    }

    async fn handle_reorg(
        &self,
        chain_id: &ChainId,
        checkpoint: &Checkpoint,
        head: &BlockHeader,
    ) -> ReorgResult<Box<Reorged>> {
        let last_block = checkpoint.last_block;
        let lo = last_block.saturating_sub(MAX_REORG_DEPTH);

        let found = self
            .find_common_ancestor(chain_id, lo, last_block)
            .await?
            .ok_or(ReorgError::AncestorNotFound {
                from: lo,
                to: last_block,
            })?;
        let common_ancestor = found.saturating_sub(1);

        let affected_blocks = last_block.saturating_sub(common_ancestor);
        if affected_blocks > MAX_REORG_DEPTH {
            return Err(ReorgError::TooDeep {
                affected_blocks,
                max_depth: MAX_REORG_DEPTH,
            });
        }

        let old_hash = checkpoint
            .last_block_hash
            .clone()
            .unwrap_or_else(|| "unknown".to_string());

        let deleted = self
            .raw_event_store
            .delete_above_block(chain_id, common_ancestor)
            .await?;

        self.checkpoint_store
            .set_to_block(chain_id, common_ancestor, None)
            .await?;
        self.checkpoint_store
            .increment_reorg_count(chain_id, None)
            .await?;

        let history = ReorgHistory {
            chain_id: chain_id.clone(),
            detected_at: Utc::now(),
            fork_block: common_ancestor,
            old_head: last_block,
            new_head: head.number,
            old_hash,
            new_hash: head.hash.to_string(),
            affected_blocks,
            rollback_to: common_ancestor,
            data_affected: format!("{{\"raw_events_deleted\":{deleted}}}"),
        };
        self.checkpoint_store.save_reorg(&history).await?;

        let notification = ReorgNotification {
            chain_id: chain_id.clone(),
            fork_block: common_ancestor.to_string(),
            old_head: last_block.to_string(),
            new_head: head.number.to_string(),
            affected_blocks,
        };

        Ok(Box::new(Reorged {
            history,
            notification,
        }))
    }
}

#[async_trait]
impl<C, K, R> ReorgApi for ReorgHandlerService<C, K, R>
where
    C: ChainClient + 'static,
    K: CheckpointStore + 'static,
    R: RawEventStore + 'static,
{
    async fn handle_new_head(
        &self,
        chain_id: &ChainId,
        head: &BlockHeader,
    ) -> ReorgResult<ReorgOutcome> {
        let checkpoint = self.checkpoint_store.get(chain_id).await?;

        let is_bootstrap = checkpoint.last_block_hash.is_none();
        let is_linear_advance = checkpoint
            .last_block_hash
            .as_deref()
            .map(|stored| stored == head.parent_hash.to_string())
            .unwrap_or(false);

        if is_bootstrap || is_linear_advance {
            let advance = self.compute_advance(head).await?;
            return Ok(ReorgOutcome::Advanced(advance));
        }

        tracing::warn!(
            chain_id = %chain_id,
            last_block = checkpoint.last_block,
            new_head = head.number,
            "reorg detected, searching for common ancestor"
        );
        let reorged = self.handle_reorg(chain_id, &checkpoint, head).await?;
        Ok(ReorgOutcome::Reorged(reorged))
    }

    async fn commit_advance(&self, chain_id: &ChainId, advance: &Advance) -> ReorgResult<()> {
        let mut checkpoint = self.checkpoint_store.get(chain_id).await?;
        checkpoint.last_block = advance.new_block;
        checkpoint.last_block_hash = Some(advance.new_hash.clone());
        if let Some(number) = advance.new_safe_block {
            checkpoint.safe_block = Some(number);
            checkpoint.safe_block_hash = advance.new_safe_hash.clone();
        }
        checkpoint.updated_at = Utc::now();
        self.checkpoint_store.upsert(&checkpoint).await
    }
}

/// Validate a contiguous batch before it is handed to the ingestion loop.
pub fn validate_batch_continuity(batch: &[BlockHeader]) -> ReorgResult<()> {
    assert_contiguous(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;
    use chain_client::InMemoryChainClient;
    use checkpoint_store::InMemoryCheckpointStore;
    use raw_event_store::{InMemoryRawEventStore, RawEvent};

    fn block(number: u64, hash: u8, parent: u8) -> BlockHeader {
        BlockHeader {
            number,
            hash: B256::repeat_byte(hash),
            parent_hash: B256::repeat_byte(parent),
            timestamp: number,
        }
    }

    fn raw_event_at(chain_id: ChainId, block_number: u64, block_hash: B256) -> RawEvent {
        RawEvent {
            chain_id,
            tx_hash: format!("0xtx{block_number}"),
            log_index: 0,
            block_number,
            block_hash: block_hash.to_string(),
            contract_address: "0xcontract".to_string(),
            event_name: Some("Transfer".to_string()),
            signature: "0xsig".to_string(),
            topics: vec![],
            data: "0x".to_string(),
            confirmations: 1,
            observed_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    fn service() -> ReorgHandlerService<InMemoryChainClient, InMemoryCheckpointStore, InMemoryRawEventStore> {
        ReorgHandlerService::new(
            Arc::new(InMemoryChainClient::new()),
            Arc::new(InMemoryCheckpointStore::new()),
            Arc::new(InMemoryRawEventStore::new()),
        )
    }

    #[tokio::test]
    async fn bootstrap_accepts_first_head_without_validation() {
        let svc = service();
        let chain_id = ChainId::eip155(1);
        let head = block(1, 1, 0);

        let outcome = svc.handle_new_head(&chain_id, &head).await.unwrap();
        let advance = match outcome {
            ReorgOutcome::Advanced(advance) => {
                assert_eq!(advance.new_block, 1);
                assert!(advance.new_safe_block.is_none());
                advance
            }
            ReorgOutcome::Reorged(_) => panic!("expected an advance"),
        };

        svc.commit_advance(&chain_id, &advance).await.unwrap();
        let checkpoint = svc.checkpoint_store.get(&chain_id).await.unwrap();
        assert_eq!(checkpoint.last_block, 1);
    }

    #[tokio::test]
    async fn linear_head_advances_checkpoint() {
        let svc = service();
        let chain_id = ChainId::eip155(1);

        svc.checkpoint_store
            .set_to_block(&chain_id, 4, Some(B256::repeat_byte(4).to_string()))
            .await
            .unwrap();

        let head = block(5, 5, 4);
        let outcome = svc.handle_new_head(&chain_id, &head).await.unwrap();
        let advance = match outcome {
            ReorgOutcome::Advanced(advance) => advance,
            ReorgOutcome::Reorged(_) => panic!("expected an advance"),
        };

        svc.commit_advance(&chain_id, &advance).await.unwrap();
        let checkpoint = svc.checkpoint_store.get(&chain_id).await.unwrap();
        assert_eq!(checkpoint.last_block, 5);
        assert_eq!(
            checkpoint.last_block_hash,
            Some(B256::repeat_byte(5).to_string())
        );
    }

    #[tokio::test]
    async fn mismatched_parent_triggers_reorg_and_finds_ancestor() {
        let svc = service();
        let chain_id = ChainId::eip155(1);

        // Current chain view, as seen by the RPC client after the fork.
        for i in 0..=5u8 {
            svc.chain_client.push_block(block(i as u64, i, i.saturating_sub(1)));
        }

        // Blocks 0..=3 were already ingested and agree with the current
        // chain; 4 and 5 were reorged out and never got a matching row.
        for i in 0..=3u8 {
            svc.raw_event_store
                .store(&raw_event_at(chain_id.clone(), i as u64, B256::repeat_byte(i)))
                .await
                .unwrap();
        }

        svc.checkpoint_store
            .set_to_block(&chain_id, 5, Some(B256::repeat_byte(99).to_string()))
            .await
            .unwrap();

        let new_head = block(6, 6, 5);
        let outcome = svc.handle_new_head(&chain_id, &new_head).await.unwrap();

        let reorged = match outcome {
            ReorgOutcome::Reorged(r) => r,
            ReorgOutcome::Advanced(_) => panic!("expected a reorg"),
        };
        assert_eq!(reorged.history.fork_block, 2);
        assert_eq!(reorged.history.affected_blocks, 3);

        let checkpoint = svc.checkpoint_store.get(&chain_id).await.unwrap();
        assert_eq!(checkpoint.last_block, 2);
        assert!(checkpoint.last_block_hash.is_none());
        assert_eq!(checkpoint.reorg_count, 1);

        assert!(!svc
            .raw_event_store
            .has_block(&chain_id, 3, &B256::repeat_byte(3).to_string())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn reorg_deeper_than_max_depth_is_fatal() {
        let svc = service();
        let chain_id = ChainId::eip155(1);

        // No raw events recorded at all: even the bottom of the search
        // window fails to match, so the fork looks deeper than the window.
        svc.chain_client.push_block(block(0, 0, 0));
        for i in 1..=200u64 {
            svc.chain_client
                .push_block(block(i, (i % 250) as u8, ((i - 1) % 250) as u8));
        }

        svc.checkpoint_store
            .set_to_block(&chain_id, 200, Some(B256::repeat_byte(250).to_string()))
            .await
            .unwrap();

        let new_head = block(201, 201, 200 % 250);
        let result = svc.handle_new_head(&chain_id, &new_head).await;
        assert!(matches!(result, Err(ReorgError::AncestorNotFound { .. })));
    }
}
