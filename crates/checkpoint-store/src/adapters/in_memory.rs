use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::domain::Checkpoint;
use crate::error::{CheckpointStoreError, CheckpointStoreResult};
use crate::ports::outbound::CheckpointStore;
use crate::ReorgHistory;
use shared_types::ChainId;

#[derive(Default)]
pub struct InMemoryCheckpointStore {
    checkpoints: Mutex<HashMap<ChainId, Checkpoint>>,
    reorgs: Mutex<Vec<ReorgHistory>>,
}

impl InMemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reorg_history(&self) -> Vec<ReorgHistory> {
        self.reorgs.lock().clone()
    }
}

#[async_trait]
impl CheckpointStore for InMemoryCheckpointStore {
    async fn get(&self, chain_id: &ChainId) -> CheckpointStoreResult<Checkpoint> {
        Ok(self
            .checkpoints
            .lock()
            .get(chain_id)
            .cloned()
            .unwrap_or_else(|| Checkpoint::zero(chain_id.clone())))
    }

    async fn upsert(&self, checkpoint: &Checkpoint) -> CheckpointStoreResult<()> {
        self.checkpoints
            .lock()
            .insert(checkpoint.chain_id.clone(), checkpoint.clone());
        Ok(())
    }

    async fn increment_reorg_count(
        &self,
        chain_id: &ChainId,
        new_hash: Option<String>,
    ) -> CheckpointStoreResult<Checkpoint> {
        let mut checkpoints = self.checkpoints.lock();
        let checkpoint = checkpoints
            .entry(chain_id.clone())
            .or_insert_with(|| Checkpoint::zero(chain_id.clone()));
        checkpoint.reorg_count += 1;
        checkpoint.last_reorg_at = Some(Utc::now());
        if new_hash.is_some() {
            checkpoint.last_block_hash = new_hash;
        }
        Ok(checkpoint.clone())
    }

    async fn set_to_block(
        &self,
        chain_id: &ChainId,
        number: u64,
        hash: Option<String>,
    ) -> CheckpointStoreResult<()> {
        let mut checkpoints = self.checkpoints.lock();
        let checkpoint = checkpoints
            .entry(chain_id.clone())
            .or_insert_with(|| Checkpoint::zero(chain_id.clone()));
        checkpoint.last_block = number;
        checkpoint.last_block_hash = hash;
        checkpoint.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, chain_id: &ChainId) -> CheckpointStoreResult<()> {
        self.checkpoints
            .lock()
            .remove(chain_id)
            .map(|_| ())
            .ok_or(CheckpointStoreError::NotFound)
    }

    async fn save_reorg(&self, history: &ReorgHistory) -> CheckpointStoreResult<()> {
        self.reorgs.lock().push(history.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_returns_zero_checkpoint_when_absent() {
        let store = InMemoryCheckpointStore::new();
        let chain_id = ChainId::eip155(1);
        let checkpoint = store.get(&chain_id).await.unwrap();
        assert_eq!(checkpoint.last_block, 0);
        assert!(checkpoint.last_block_hash.is_none());
    }

    #[tokio::test]
    async fn delete_on_absent_row_is_not_found() {
        let store = InMemoryCheckpointStore::new();
        let chain_id = ChainId::eip155(1);
        assert!(matches!(
            store.delete(&chain_id).await,
            Err(CheckpointStoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn set_to_block_then_get_round_trips() {
        let store = InMemoryCheckpointStore::new();
        let chain_id = ChainId::eip155(1);
        store
            .set_to_block(&chain_id, 100, Some("0xabc".to_string()))
            .await
            .unwrap();
        let checkpoint = store.get(&chain_id).await.unwrap();
        assert_eq!(checkpoint.last_block, 100);
        assert_eq!(checkpoint.last_block_hash.as_deref(), Some("0xabc"));
    }
}
