use std::time::Duration;

use alloy_primitives::Address;
use shared_types::ChainId;

pub const MAX_BLOCK_BATCH: u64 = 100;
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(5);
pub const INTER_BATCH_PAUSE: Duration = Duration::from_millis(100);

/// Per-chain tuning, supplied by configuration (`{CHAIN}_RPC`,
/// `{CHAIN}_FACTORY`, `{CHAIN}_CONFIRMATIONS`, `POLLING_INTERVAL_SECONDS`).
#[derive(Debug, Clone)]
pub struct ChainOrchestratorConfig {
    pub chain_id: ChainId,
    pub factory_address: Address,
    pub required_confirmations: u64,
    pub polling_interval: Duration,
    pub max_block_batch: u64,
}

impl ChainOrchestratorConfig {
    pub fn new(chain_id: ChainId, factory_address: Address) -> Self {
        let required_confirmations = default_required_confirmations(&chain_id);
        Self {
            chain_id,
            factory_address,
            required_confirmations,
            polling_interval: DEFAULT_POLLING_INTERVAL,
            max_block_batch: MAX_BLOCK_BATCH,
        }
    }
}

/// Confirmation depths by well-known `eip155` numeric chain id; chains not
/// listed fall back to the conservative default.
pub fn default_required_confirmations(chain_id: &ChainId) -> u64 {
    match chain_id.eip155_numeric() {
        Some(1) => 12,          // Ethereum mainnet
        Some(11_155_111) => 3,  // Sepolia
        Some(137) => 20,        // Polygon
        Some(80_001) => 5,      // Mumbai
        _ => 6,
    }
}
