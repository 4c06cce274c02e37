use chrono::{DateTime, Utc};
use shared_types::{ChainId, RawEventId};

/// Every log ever observed, immutable once inserted. Deleted only by reorg
/// rewind above the common ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub chain_id: ChainId,
    pub tx_hash: String,
    pub log_index: u64,
    pub block_number: u64,
    pub block_hash: String,
    pub contract_address: String,
    pub event_name: Option<String>,
    pub signature: String,
    pub topics: Vec<String>,
    pub data: String,
    pub confirmations: u64,
    pub observed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl RawEvent {
    /// `{chain_id}_{tx_hash}_{log_index}`, unique on the composite key.
    pub fn id(&self) -> String {
        RawEventId::new(self.chain_id.clone(), self.tx_hash.clone(), self.log_index).to_event_id()
    }
}
