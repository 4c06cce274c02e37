use alloy_primitives::{Address, U256};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared_types::ChainId;

/// The fields a `CollectionCreated` event contributes to the projection.
/// `contract_address` is the collection contract itself (`collection` on the
/// source event), not the factory that emitted the log.
#[derive(Debug, Clone)]
pub struct CollectionFields {
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub creator: Address,
    pub name: String,
    pub symbol: String,
    pub max_supply: U256,
}

impl CollectionFields {
    pub fn slug(&self) -> String {
        super::slug::slugify(&self.name)
    }
}

/// The Collection read model row. Royalty and market fields have no source
/// in `CollectionCreated`; they start at their neutral defaults and are left
/// for a later enrichment pass the projector does not itself perform.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub id: Uuid,
    pub slug: String,
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub creator: Address,
    pub name: String,
    pub symbol: String,
    pub royalty_recipient: Option<Address>,
    pub royalty_bps: u32,
    pub max_supply: U256,
    pub floor_price: Option<U256>,
    pub volume: U256,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// A freshly projected row, as created the first time a collection's
    /// `CollectionCreated` event is seen.
    pub fn new(fields: &CollectionFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: fields.slug(),
            chain_id: fields.chain_id.clone(),
            contract_address: fields.contract_address,
            creator: fields.creator,
            name: fields.name.clone(),
            symbol: fields.symbol.clone(),
            royalty_recipient: None,
            royalty_bps: 0,
            max_supply: fields.max_supply,
            floor_price: None,
            volume: U256::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a later `CollectionCreated` replay's mutable fields, preserving
    /// `id` and `created_at`. Royalty/market fields are untouched since this
    /// event never carries them.
    pub fn apply(&mut self, fields: &CollectionFields) {
        self.slug = fields.slug();
        self.creator = fields.creator;
        self.name = fields.name.clone();
        self.symbol = fields.symbol.clone();
        self.max_supply = fields.max_supply;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn fields() -> CollectionFields {
        CollectionFields {
            chain_id: ChainId::eip155(1),
            contract_address: address!("0000000000000000000000000000000000c0de"),
            creator: address!("00000000000000000000000000000000000b0b"),
            name: "Bored Ape".to_string(),
            symbol: "BAYC".to_string(),
            max_supply: U256::from(10_000u64),
        }
    }

    #[test]
    fn new_collection_derives_slug_from_name() {
        let collection = Collection::new(&fields());
        assert_eq!(collection.slug, "bored-ape");
        assert_eq!(collection.royalty_bps, 0);
    }

    #[test]
    fn apply_preserves_id_and_created_at() {
        let mut collection = Collection::new(&fields());
        let id = collection.id;
        let created_at = collection.created_at;

        let mut renamed = fields();
        renamed.name = "Bored Ape Renamed".to_string();
        collection.apply(&renamed);

        assert_eq!(collection.id, id);
        assert_eq!(collection.created_at, created_at);
        assert_eq!(collection.slug, "bored-ape-renamed");
    }
}
