use chrono::Utc;
use serde::Serialize;

use shared_types::event::RoutableEvent;
use shared_types::{ChainId, DomainEvent};

pub const SCHEMA: &str = "marketplace.events.v1";
pub const SCHEMA_VERSION: &str = "1.0";
pub const EXCHANGE: &str = "collections.events";
pub const CONTENT_TYPE: &str = "application/json";

/// The wire envelope every published message carries, regardless of which
/// [`DomainEvent`] variant produced it.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    pub schema: &'static str,
    pub version: &'static str,
    pub event_id: String,
    pub event_type: &'static str,
    pub chain_id: String,
    pub tx_hash: Option<String>,
    pub contract: Option<String>,
    pub data: serde_json::Value,
    pub timestamp: i64,
}

impl EventEnvelope {
    pub fn from_event(event: &DomainEvent) -> Self {
        let (tx_hash, contract) = source_fields(event);
        Self {
            schema: SCHEMA,
            version: SCHEMA_VERSION,
            event_id: envelope_event_id(event),
            event_type: event.event_type(),
            chain_id: event.chain_id().to_string(),
            tx_hash,
            contract,
            data: event.payload(),
            timestamp: Utc::now().timestamp(),
        }
    }

    pub fn routing_key(event: &DomainEvent) -> String {
        event.routing_key()
    }

    /// Not a [`DomainEvent`]: a liveness ping the orchestrator emits on a
    /// timer, carrying no on-chain tx to key from.
    pub fn heartbeat(chain_id: &ChainId) -> Self {
        let timestamp = Utc::now().timestamp();
        Self {
            schema: SCHEMA,
            version: SCHEMA_VERSION,
            event_id: format!("heartbeat_{chain_id}_{timestamp}"),
            event_type: "indexer.health",
            chain_id: chain_id.to_string(),
            tx_hash: None,
            contract: None,
            data: serde_json::json!({ "chain_id": chain_id.as_str() }),
            timestamp,
        }
    }

    pub fn heartbeat_routing_key(chain_id: &ChainId) -> String {
        format!("indexer.health.{chain_id}")
    }
}

/// `{chain_id}_{tx_hash}_{log_index}` for events with a raw-event origin;
/// otherwise a fresh id, since those events have no on-chain tx to key from.
fn envelope_event_id(event: &DomainEvent) -> String {
    event.source_event_id().unwrap_or_else(|| {
        format!(
            "{}_{}",
            event.event_type(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default()
        )
    })
}

fn source_fields(event: &DomainEvent) -> (Option<String>, Option<String>) {
    match event {
        DomainEvent::CollectionCreated(e) => {
            (Some(e.tx_hash.to_string()), Some(e.contract_address.to_string()))
        }
        DomainEvent::Erc721Transfer(e) => {
            (Some(e.tx_hash.to_string()), Some(e.contract_address.to_string()))
        }
        DomainEvent::Erc1155TransferSingle(e) => {
            (Some(e.tx_hash.to_string()), Some(e.contract_address.to_string()))
        }
        DomainEvent::Erc1155TransferBatch(e) => {
            (Some(e.tx_hash.to_string()), Some(e.contract_address.to_string()))
        }
        DomainEvent::CollectionUpserted(e) => (None, Some(e.contract_address.to_string())),
        DomainEvent::WalletLinked(_) | DomainEvent::ReorgDetected(_) => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Address, B256, U256};
    use shared_types::event::Erc721Transfer;
    use shared_types::ChainId;

    fn sample() -> DomainEvent {
        DomainEvent::Erc721Transfer(Erc721Transfer {
            chain_id: ChainId::eip155(1),
            contract_address: address!("0000000000000000000000000000000000c0de"),
            tx_hash: B256::ZERO,
            log_index: 2,
            from: Address::ZERO,
            to: address!("abcdef0123456789abcdef0123456789abcdef01"),
            token_id: U256::from(1u64),
            is_mint: true,
        })
    }

    #[test]
    fn envelope_carries_stable_event_id_and_routing_fields() {
        let event = sample();
        let envelope = EventEnvelope::from_event(&event);
        assert_eq!(envelope.schema, SCHEMA);
        assert_eq!(envelope.event_type, "mint.indexed");
        assert!(envelope.event_id.ends_with("_2"));
        assert_eq!(envelope.contract, Some(address!("0000000000000000000000000000000000c0de").to_string()));
        assert_eq!(EventEnvelope::routing_key(&event), "mints.events.minted.eip155-1");
    }
}
