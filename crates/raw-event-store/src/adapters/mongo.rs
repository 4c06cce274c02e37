//! MongoDB-backed [`RawEventStore`].
//!
//! Collection `events.raw` with a unique compound index on
//! `(chain_id, tx_hash, log_index)` and secondaries on
//! `(chain_id, block_number)`, `(chain_id, contract_address)`,
//! `(chain_id, event_name)`, and `created_at` descending.

use async_trait::async_trait;
use bson::{doc, DateTime as BsonDateTime};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use crate::domain::RawEvent;
use crate::error::{RawEventStoreError, RawEventStoreResult};
use crate::ports::outbound::RawEventStore;
use shared_types::ChainId;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawEventDocument {
    #[serde(rename = "_id")]
    id: String,
    chain_id: String,
    tx_hash: String,
    log_index: i64,
    block_number: i64,
    block_hash: String,
    contract_address: String,
    event_name: Option<String>,
    signature: String,
    topics: Vec<String>,
    data: String,
    confirmations: i64,
    observed_at: BsonDateTime,
    created_at: BsonDateTime,
}

impl From<&RawEvent> for RawEventDocument {
    fn from(event: &RawEvent) -> Self {
        Self {
            id: event.id(),
            chain_id: event.chain_id.as_str().to_string(),
            tx_hash: event.tx_hash.clone(),
            log_index: event.log_index as i64,
            block_number: event.block_number as i64,
            block_hash: event.block_hash.clone(),
            contract_address: event.contract_address.clone(),
            event_name: event.event_name.clone(),
            signature: event.signature.clone(),
            topics: event.topics.clone(),
            data: event.data.clone(),
            confirmations: event.confirmations as i64,
            observed_at: BsonDateTime::from_chrono(event.observed_at),
            created_at: BsonDateTime::from_chrono(event.created_at),
        }
    }
}

impl TryFrom<RawEventDocument> for RawEvent {
    type Error = RawEventStoreError;

    fn try_from(doc: RawEventDocument) -> Result<Self, Self::Error> {
        Ok(RawEvent {
            chain_id: ChainId::parse(doc.chain_id)
                .map_err(|e| RawEventStoreError::Database(e.to_string()))?,
            tx_hash: doc.tx_hash,
            log_index: doc.log_index as u64,
            block_number: doc.block_number as u64,
            block_hash: doc.block_hash,
            contract_address: doc.contract_address,
            event_name: doc.event_name,
            signature: doc.signature,
            topics: doc.topics,
            data: doc.data,
            confirmations: doc.confirmations as u64,
            observed_at: doc.observed_at.to_chrono(),
            created_at: doc.created_at.to_chrono(),
        })
    }
}

pub struct MongoRawEventStore {
    collection: Collection<RawEventDocument>,
}

impl MongoRawEventStore {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("events.raw"),
        }
    }

    pub async fn ensure_indexes(&self) -> RawEventStoreResult<()> {
        let unique = IndexModel::builder()
            .keys(doc! { "chain_id": 1, "tx_hash": 1, "log_index": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let by_block = IndexModel::builder()
            .keys(doc! { "chain_id": 1, "block_number": 1 })
            .build();
        let by_contract = IndexModel::builder()
            .keys(doc! { "chain_id": 1, "contract_address": 1 })
            .build();
        let by_event_name = IndexModel::builder()
            .keys(doc! { "chain_id": 1, "event_name": 1 })
            .build();
        let by_created_at = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .build();

        self.collection
            .create_indexes(vec![unique, by_block, by_contract, by_event_name, by_created_at])
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RawEventStore for MongoRawEventStore {
    async fn store(&self, event: &RawEvent) -> RawEventStoreResult<bool> {
        let document = RawEventDocument::from(event);
        let result = self
            .collection
            .update_one(
                doc! { "_id": &document.id },
                doc! { "$setOnInsert": bson::to_bson(&document).map_err(|e| RawEventStoreError::Database(e.to_string()))? },
            )
            .upsert(true)
            .await?;

        Ok(result.upserted_id.is_some())
    }

    async fn get(
        &self,
        chain_id: &ChainId,
        tx_hash: &str,
        log_index: u64,
    ) -> RawEventStoreResult<RawEvent> {
        let id = shared_types::RawEventId::new(chain_id.clone(), tx_hash, log_index).to_event_id();
        let document = self
            .collection
            .find_one(doc! { "_id": &id })
            .await?
            .ok_or_else(|| RawEventStoreError::NotFound(id.clone()))?;
        document.try_into()
    }

    async fn list_by_block(
        &self,
        chain_id: &ChainId,
        block_number: u64,
    ) -> RawEventStoreResult<Vec<RawEvent>> {
        use futures::TryStreamExt;

        let options = FindOptions::builder().sort(doc! { "log_index": 1 }).build();
        let mut cursor = self
            .collection
            .find(doc! {
                "chain_id": chain_id.as_str(),
                "block_number": block_number as i64,
            })
            .with_options(options)
            .await?;

        let mut events = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            events.push(document.try_into()?);
        }
        Ok(events)
    }

    async fn list_by_contract(
        &self,
        chain_id: &ChainId,
        contract_address: &str,
        limit: u32,
    ) -> RawEventStoreResult<Vec<RawEvent>> {
        use futures::TryStreamExt;

        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .limit(limit as i64)
            .build();
        let mut cursor = self
            .collection
            .find(doc! {
                "chain_id": chain_id.as_str(),
                "contract_address": contract_address,
            })
            .with_options(options)
            .await?;

        let mut events = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            events.push(document.try_into()?);
        }
        Ok(events)
    }

    async fn has_block(
        &self,
        chain_id: &ChainId,
        block_number: u64,
        block_hash: &str,
    ) -> RawEventStoreResult<bool> {
        let count = self
            .collection
            .count_documents(doc! {
                "chain_id": chain_id.as_str(),
                "block_number": block_number as i64,
                "block_hash": block_hash,
            })
            .await?;
        Ok(count > 0)
    }

    async fn delete_above_block(&self, chain_id: &ChainId, above: u64) -> RawEventStoreResult<u64> {
        let result = self
            .collection
            .delete_many(doc! {
                "chain_id": chain_id.as_str(),
                "block_number": doc! { "$gt": above as i64 },
            })
            .await?;
        Ok(result.deleted_count)
    }
}

