//! The domain event sum type.
//!
//! The four parsed event families (ERC-721 `Transfer`, ERC-1155
//! `TransferSingle`/`TransferBatch`, `CollectionCreated`) plus the two events
//! derived further downstream (`CollectionUpserted` by the catalog projector,
//! `WalletLinked` by the wallet link service) are variants of one tagged sum.
//! The publisher and every consumer treat them uniformly through
//! [`RoutableEvent`] rather than switching on the concrete variant.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::chain_id::ChainId;
use crate::ids::RawEventId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc721Transfer {
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub tx_hash: B256,
    pub log_index: u64,
    pub from: Address,
    pub to: Address,
    #[serde(with = "u256_decimal")]
    pub token_id: U256,
    pub is_mint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc1155TransferSingle {
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub tx_hash: B256,
    pub log_index: u64,
    pub operator: Address,
    pub from: Address,
    pub to: Address,
    #[serde(with = "u256_decimal")]
    pub id: U256,
    #[serde(with = "u256_decimal")]
    pub value: U256,
    pub is_mint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc1155TransferBatch {
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub tx_hash: B256,
    pub log_index: u64,
    pub operator: Address,
    pub from: Address,
    pub to: Address,
    #[serde(with = "u256_decimal_vec")]
    pub ids: Vec<U256>,
    #[serde(with = "u256_decimal_vec")]
    pub values: Vec<U256>,
    pub is_mint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionCreated {
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub tx_hash: B256,
    pub log_index: u64,
    pub creator: Address,
    pub collection: Address,
    pub name: String,
    pub symbol: String,
    #[serde(with = "u256_decimal")]
    pub max_supply: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionUpserted {
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub collection_id: String,
    pub slug: String,
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletLinked {
    pub user_id: String,
    pub account_id: String,
    pub chain_id: ChainId,
    pub address: String,
    pub is_primary: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorgNotification {
    pub chain_id: ChainId,
    pub fork_block: String,
    pub old_head: String,
    pub new_head: String,
    pub affected_blocks: u64,
}

/// The tagged sum every downstream consumer matches on.
///
/// The three mint families all share the wire `event_type` value
/// `"mint.indexed"` (see [`RoutableEvent::event_type`]) — that string alone
/// cannot be this enum's serde tag, since `Deserialize` would resolve it to
/// whichever mint variant is declared first and reject the other two for
/// missing fields. Each variant's serde tag is therefore distinct; the
/// shared wire value is produced separately by `event_type()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "data")]
pub enum DomainEvent {
    #[serde(rename = "collection_created")]
    CollectionCreated(CollectionCreated),
    #[serde(rename = "mint.indexed.erc721_transfer")]
    Erc721Transfer(Erc721Transfer),
    #[serde(rename = "mint.indexed.erc1155_transfer_single")]
    Erc1155TransferSingle(Erc1155TransferSingle),
    #[serde(rename = "mint.indexed.erc1155_transfer_batch")]
    Erc1155TransferBatch(Erc1155TransferBatch),
    #[serde(rename = "collection_upserted")]
    CollectionUpserted(CollectionUpserted),
    #[serde(rename = "wallet.linked")]
    WalletLinked(WalletLinked),
    #[serde(rename = "reorg.detected")]
    ReorgDetected(ReorgNotification),
}

/// Capability set the publisher needs from any domain event: a stable
/// `event_type`, the routing key it travels under, the chain it belongs to,
/// and a JSON payload. No component needs to match on the concrete variant to
/// publish or log an event.
pub trait RoutableEvent {
    fn event_type(&self) -> &'static str;
    fn chain_id(&self) -> &ChainId;
    fn routing_key(&self) -> String;
    fn payload(&self) -> serde_json::Value;
}

impl RoutableEvent for DomainEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::CollectionCreated(_) => "collection_created",
            DomainEvent::Erc721Transfer(_)
            | DomainEvent::Erc1155TransferSingle(_)
            | DomainEvent::Erc1155TransferBatch(_) => "mint.indexed",
            DomainEvent::CollectionUpserted(_) => "collection_upserted",
            DomainEvent::WalletLinked(_) => "wallet.linked",
            DomainEvent::ReorgDetected(_) => "reorg.detected",
        }
    }

    fn chain_id(&self) -> &ChainId {
        match self {
            DomainEvent::CollectionCreated(e) => &e.chain_id,
            DomainEvent::Erc721Transfer(e) => &e.chain_id,
            DomainEvent::Erc1155TransferSingle(e) => &e.chain_id,
            DomainEvent::Erc1155TransferBatch(e) => &e.chain_id,
            DomainEvent::CollectionUpserted(e) => &e.chain_id,
            DomainEvent::WalletLinked(e) => &e.chain_id,
            DomainEvent::ReorgDetected(e) => &e.chain_id,
        }
    }

    fn routing_key(&self) -> String {
        match self {
            DomainEvent::CollectionCreated(e) => {
                format!("collections.events.created.{}", e.chain_id)
            }
            DomainEvent::Erc721Transfer(e) => {
                format!("mints.events.minted.{}", e.chain_id.routing_fragment())
            }
            DomainEvent::Erc1155TransferSingle(e) => {
                format!("mints.events.minted.{}", e.chain_id.routing_fragment())
            }
            DomainEvent::Erc1155TransferBatch(e) => {
                format!("mints.events.minted.{}", e.chain_id.routing_fragment())
            }
            DomainEvent::CollectionUpserted(e) => {
                format!("{}.{}", e.chain_id, e.contract_address)
            }
            DomainEvent::WalletLinked(_) => "wallet.linked".to_string(),
            DomainEvent::ReorgDetected(e) => format!("indexer.reorg.{}", e.chain_id),
        }
    }

    fn payload(&self) -> serde_json::Value {
        match self {
            DomainEvent::CollectionCreated(e) => serde_json::to_value(e),
            DomainEvent::Erc721Transfer(e) => serde_json::to_value(e),
            DomainEvent::Erc1155TransferSingle(e) => serde_json::to_value(e),
            DomainEvent::Erc1155TransferBatch(e) => serde_json::to_value(e),
            DomainEvent::CollectionUpserted(e) => serde_json::to_value(e),
            DomainEvent::WalletLinked(e) => serde_json::to_value(e),
            DomainEvent::ReorgDetected(e) => serde_json::to_value(e),
        }
        .unwrap_or(serde_json::Value::Null)
    }
}

impl DomainEvent {
    /// The raw-event idempotency key this domain event was derived from, for
    /// events that have one (every mint/collection-created event does;
    /// `CollectionUpserted`/`WalletLinked`/`ReorgDetected` are themselves
    /// derived and carry their own identity instead).
    pub fn source_event_id(&self) -> Option<String> {
        let (chain_id, tx_hash, log_index) = match self {
            DomainEvent::CollectionCreated(e) => (&e.chain_id, e.tx_hash, e.log_index),
            DomainEvent::Erc721Transfer(e) => (&e.chain_id, e.tx_hash, e.log_index),
            DomainEvent::Erc1155TransferSingle(e) => (&e.chain_id, e.tx_hash, e.log_index),
            DomainEvent::Erc1155TransferBatch(e) => (&e.chain_id, e.tx_hash, e.log_index),
            _ => return None,
        };
        Some(RawEventId::new(chain_id.clone(), tx_hash.to_string(), log_index).to_event_id())
    }

    pub fn is_mint(&self) -> bool {
        matches!(
            self,
            DomainEvent::Erc721Transfer(Erc721Transfer { is_mint: true, .. })
                | DomainEvent::Erc1155TransferSingle(Erc1155TransferSingle { is_mint: true, .. })
                | DomainEvent::Erc1155TransferBatch(Erc1155TransferBatch { is_mint: true, .. })
        )
    }
}

/// Stringify `U256` as decimal for wire/storage boundaries (never lexical hex
/// or raw JSON numbers, which would silently truncate).
mod u256_decimal {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

mod u256_decimal_vec {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[U256], serializer: S) -> Result<S::Ok, S::Error> {
        let strings: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        strings.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<U256>, D::Error> {
        let strings = Vec::<String>::deserialize(deserializer)?;
        strings
            .into_iter()
            .map(|s| s.parse().map_err(serde::de::Error::custom))
            .collect()
    }
}
