//! Idempotency key helpers.
//!
//! Raw events are keyed by `(chain_id, tx_hash, log_index)`. The same triple,
//! joined with underscores, is the domain `event_id` used by the publisher
//! and the catalog projector's idempotency table.

use crate::chain_id::ChainId;
use crate::errors::CoreError;

/// The parsed form of a `{chain_id}_{tx_hash}_{log_index}` event id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEventId {
    pub chain_id: ChainId,
    pub tx_hash: String,
    pub log_index: u64,
}

impl RawEventId {
    pub fn new(chain_id: ChainId, tx_hash: impl Into<String>, log_index: u64) -> Self {
        Self {
            chain_id,
            tx_hash: tx_hash.into(),
            log_index,
        }
    }

    /// Render as `{chain_id}_{tx_hash}_{log_index}`.
    pub fn to_event_id(&self) -> String {
        format!("{}_{}_{}", self.chain_id, self.tx_hash, self.log_index)
    }
}

/// Parse an event id produced by [`RawEventId::to_event_id`] back into its
/// triple. Neither a CAIP-2 chain id nor a `0x`-hex tx hash ever contains an
/// underscore, so splitting from the right twice is unambiguous.
pub fn parse_event_id(id: &str) -> Result<RawEventId, CoreError> {
    let mut parts = id.rsplitn(3, '_');
    let log_index = parts
        .next()
        .ok_or_else(|| CoreError::ParseError(format!("empty event id '{id}'")))?;
    let tx_hash = parts
        .next()
        .ok_or_else(|| CoreError::ParseError(format!("event id '{id}' missing tx hash")))?;
    let chain_id = parts
        .next()
        .ok_or_else(|| CoreError::ParseError(format!("event id '{id}' missing chain id")))?;

    if parts.next().is_some() {
        return Err(CoreError::ParseError(format!(
            "event id '{id}' has more than three underscore-separated parts"
        )));
    }

    let log_index: u64 = log_index
        .parse()
        .map_err(|_| CoreError::ParseError(format!("event id '{id}' has non-numeric log index")))?;

    Ok(RawEventId::new(ChainId::parse(chain_id)?, tx_hash, log_index))
}
