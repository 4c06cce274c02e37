use async_trait::async_trait;

use crate::domain::{Checkpoint, ReorgHistory};
use crate::error::CheckpointStoreResult;
use shared_types::ChainId;

#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Never fails on a missing row; returns [`Checkpoint::zero`] instead.
    async fn get(&self, chain_id: &ChainId) -> CheckpointStoreResult<Checkpoint>;

    /// Insert or update by primary key in one statement.
    async fn upsert(&self, checkpoint: &Checkpoint) -> CheckpointStoreResult<()>;

    /// Read current, add one to the reorg counter, write, under a transaction.
    async fn increment_reorg_count(
        &self,
        chain_id: &ChainId,
        new_hash: Option<String>,
    ) -> CheckpointStoreResult<Checkpoint>;

    async fn set_to_block(
        &self,
        chain_id: &ChainId,
        number: u64,
        hash: Option<String>,
    ) -> CheckpointStoreResult<()>;

    async fn delete(&self, chain_id: &ChainId) -> CheckpointStoreResult<()>;

    async fn save_reorg(&self, history: &ReorgHistory) -> CheckpointStoreResult<()>;
}
