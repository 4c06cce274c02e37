//! Drives the projector through its public ports only, the way the
//! catalog-projector consumer in the binary would.

use std::sync::Arc;

use alloy_primitives::{address, B256, U256};

use catalog_projector::{CatalogProjector, CatalogProjectorService, InMemoryCatalogStore};
use event_publisher::InMemoryEventPublisher;
use shared_types::event::CollectionCreated;
use shared_types::{ChainId, DomainEvent};

fn collection_created(tx: u8, collection: alloy_primitives::Address, name: &str) -> DomainEvent {
    DomainEvent::CollectionCreated(CollectionCreated {
        chain_id: ChainId::eip155(1),
        contract_address: address!("00000000000000000000000000000000fac707"),
        tx_hash: B256::repeat_byte(tx),
        log_index: 0,
        creator: address!("00000000000000000000000000000000000b0b"),
        collection,
        name: name.to_string(),
        symbol: "SYM".to_string(),
        max_supply: U256::from(1_000u64),
    })
}

#[tokio::test]
async fn two_distinct_collections_project_independently_and_publish_once_each() {
    let store = Arc::new(InMemoryCatalogStore::new());
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let svc = CatalogProjectorService::new(store.clone(), publisher.clone());

    let collection_a = address!("000000000000000000000000000000000000a1");
    let collection_b = address!("000000000000000000000000000000000000b2");

    svc.project(&collection_created(1, collection_a, "Collection A")).await.unwrap();
    svc.project(&collection_created(2, collection_b, "Collection B")).await.unwrap();

    // Same event replayed (e.g. at-least-once redelivery) must not duplicate
    // the row or re-publish the derived event.
    svc.project(&collection_created(1, collection_a, "Collection A")).await.unwrap();

    assert_eq!(store.collections().len(), 2);
    assert_eq!(publisher.len(), 2);

    let slugs: Vec<_> = store.collections().iter().map(|c| c.slug.clone()).collect();
    assert!(slugs.contains(&"collection-a".to_string()));
    assert!(slugs.contains(&"collection-b".to_string()));
}
