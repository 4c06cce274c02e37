use chrono::{DateTime, Utc};
use shared_types::ChainId;

/// Per-chain polling cursor. `safe_block` trails `last_block` by
/// `SAFE_BLOCK_LAG` once the chain has advanced that far, naming a point past
/// which reorgs are no longer considered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub chain_id: ChainId,
    pub last_block: u64,
    pub last_block_hash: Option<String>,
    pub safe_block: Option<u64>,
    pub safe_block_hash: Option<String>,
    pub reorg_count: u64,
    pub last_reorg_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

pub const SAFE_BLOCK_LAG: u64 = 64;

impl Checkpoint {
    /// The checkpoint returned for a chain that has never been processed.
    pub fn zero(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            last_block: 0,
            last_block_hash: None,
            safe_block: None,
            safe_block_hash: None,
            reorg_count: 0,
            last_reorg_at: None,
            updated_at: Utc::now(),
        }
    }
}

/// One row per detected reorg, written once and never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorgHistory {
    pub chain_id: ChainId,
    pub detected_at: DateTime<Utc>,
    pub fork_block: u64,
    pub old_head: u64,
    pub new_head: u64,
    pub old_hash: String,
    pub new_hash: String,
    pub affected_blocks: u64,
    pub rollback_to: u64,
    pub data_affected: String,
}
