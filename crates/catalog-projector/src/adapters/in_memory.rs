use std::collections::{HashMap, HashSet};

use alloy_primitives::Address;
use async_trait::async_trait;
use parking_lot::Mutex;

use shared_types::ChainId;

use crate::domain::{Collection, CollectionFields};
use crate::error::CatalogResult;
use crate::ports::outbound::CatalogStore;

#[derive(Default)]
pub struct InMemoryCatalogStore {
    processed: Mutex<HashSet<String>>,
    collections: Mutex<HashMap<(ChainId, Address), Collection>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.collections.lock().values().cloned().collect()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn upsert_collection(
        &self,
        event_id: &str,
        fields: &CollectionFields,
    ) -> CatalogResult<Option<(Collection, bool)>> {
        if !self.processed.lock().insert(event_id.to_string()) {
            return Ok(None);
        }

        let key = (fields.chain_id.clone(), fields.contract_address);
        let mut collections = self.collections.lock();
        let is_new = !collections.contains_key(&key);
        let collection = collections
            .entry(key)
            .and_modify(|c| c.apply(fields))
            .or_insert_with(|| Collection::new(fields));

        Ok(Some((collection.clone(), is_new)))
    }
}
