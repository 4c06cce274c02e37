use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// A block's identity and lineage as seen over RPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub timestamp: u64,
}
