use alloy_primitives::{Address, Bytes, B256};
use serde::{Deserialize, Serialize};

/// A request to the `eth_getLogs` RPC method.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub from_block: u64,
    pub to_block: u64,
    pub addresses: Vec<Address>,
    pub topics: Vec<B256>,
}

/// A single decoded log entry, ordered ascending by `(block_number, log_index)`
/// within any batch this crate returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub block_number: u64,
    pub block_hash: B256,
    pub tx_hash: B256,
    pub log_index: u64,
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}
