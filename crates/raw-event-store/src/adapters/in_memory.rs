use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::RawEvent;
use crate::error::{RawEventStoreError, RawEventStoreResult};
use crate::ports::outbound::RawEventStore;
use shared_types::{ChainId, RawEventId};

#[derive(Default)]
pub struct InMemoryRawEventStore {
    events: Mutex<HashMap<String, RawEvent>>,
}

impl InMemoryRawEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RawEventStore for InMemoryRawEventStore {
    async fn store(&self, event: &RawEvent) -> RawEventStoreResult<bool> {
        let mut events = self.events.lock();
        let id = event.id();
        if events.contains_key(&id) {
            return Ok(false);
        }
        events.insert(id, event.clone());
        Ok(true)
    }

    async fn get(
        &self,
        chain_id: &ChainId,
        tx_hash: &str,
        log_index: u64,
    ) -> RawEventStoreResult<RawEvent> {
        let id = RawEventId::new(chain_id.clone(), tx_hash, log_index).to_event_id();
        self.events
            .lock()
            .get(&id)
            .cloned()
            .ok_or(RawEventStoreError::NotFound(id))
    }

    async fn list_by_block(
        &self,
        chain_id: &ChainId,
        block_number: u64,
    ) -> RawEventStoreResult<Vec<RawEvent>> {
        let mut matched: Vec<RawEvent> = self
            .events
            .lock()
            .values()
            .filter(|e| &e.chain_id == chain_id && e.block_number == block_number)
            .cloned()
            .collect();
        matched.sort_by_key(|e| e.log_index);
        Ok(matched)
    }

    async fn list_by_contract(
        &self,
        chain_id: &ChainId,
        contract_address: &str,
        limit: u32,
    ) -> RawEventStoreResult<Vec<RawEvent>> {
        let mut matched: Vec<RawEvent> = self
            .events
            .lock()
            .values()
            .filter(|e| &e.chain_id == chain_id && e.contract_address == contract_address)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(limit as usize);
        Ok(matched)
    }

    async fn has_block(
        &self,
        chain_id: &ChainId,
        block_number: u64,
        block_hash: &str,
    ) -> RawEventStoreResult<bool> {
        Ok(self
            .events
            .lock()
            .values()
            .any(|e| &e.chain_id == chain_id && e.block_number == block_number && e.block_hash == block_hash))
    }

    async fn delete_above_block(&self, chain_id: &ChainId, above: u64) -> RawEventStoreResult<u64> {
        let mut events = self.events.lock();
        let before = events.len();
        events.retain(|_, e| !(&e.chain_id == chain_id && e.block_number > above));
        Ok((before - events.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample(chain_id: ChainId, tx_hash: &str, log_index: u64, block_number: u64) -> RawEvent {
        RawEvent {
            chain_id,
            tx_hash: tx_hash.to_string(),
            log_index,
            block_number,
            block_hash: "0xblock".to_string(),
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

    #[tokio::test]
    async fn duplicate_store_is_idempotent() {
        let store = InMemoryRawEventStore::new();
        let chain_id = ChainId::eip155(1);
        let event = sample(chain_id, "0xdeadbeef", 2, 100);

        assert!(store.store(&event).await.unwrap());
        assert!(!store.store(&event).await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn delete_above_block_only_removes_newer_rows() {
        let store = InMemoryRawEventStore::new();
        let chain_id = ChainId::eip155(1);
        store.store(&sample(chain_id.clone(), "0x1", 0, 98)).await.unwrap();
        store.store(&sample(chain_id.clone(), "0x2", 0, 99)).await.unwrap();
        store.store(&sample(chain_id.clone(), "0x3", 0, 100)).await.unwrap();

        let deleted = store.delete_above_block(&chain_id, 98).await.unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(store.len(), 1);
    }
}
