use async_trait::async_trait;

use crate::domain::RawEvent;
use crate::error::RawEventStoreResult;
use shared_types::ChainId;

#[async_trait]
pub trait RawEventStore: Send + Sync {
    /// Insert-if-absent keyed by `(chain_id, tx_hash, log_index)`. A duplicate
    /// is a silent success: the caller cannot tell apart a fresh insert from
    /// a replay by the return value alone, so it also reports whether this
    /// call was the one that actually created the row.
    async fn store(&self, event: &RawEvent) -> RawEventStoreResult<bool>;

    async fn get(
        &self,
        chain_id: &ChainId,
        tx_hash: &str,
        log_index: u64,
    ) -> RawEventStoreResult<RawEvent>;

    /// Ordered by `log_index` ascending.
    async fn list_by_block(
        &self,
        chain_id: &ChainId,
        block_number: u64,
    ) -> RawEventStoreResult<Vec<RawEvent>>;

    /// Newest first.
    async fn list_by_contract(
        &self,
        chain_id: &ChainId,
        contract_address: &str,
        limit: u32,
    ) -> RawEventStoreResult<Vec<RawEvent>>;

    /// Whether the store has ever seen a block with this exact
    /// `(chain, number, hash)` triple, used by the reorg handler's
    /// common-ancestor search instead of a `blocks` table.
    async fn has_block(
        &self,
        chain_id: &ChainId,
        block_number: u64,
        block_hash: &str,
    ) -> RawEventStoreResult<bool>;

    /// Delete every event with `block_number > above`. Returns the count
    /// deleted, for the reorg history's affected-ids summary.
    async fn delete_above_block(
        &self,
        chain_id: &ChainId,
        above: u64,
    ) -> RawEventStoreResult<u64>;
}
