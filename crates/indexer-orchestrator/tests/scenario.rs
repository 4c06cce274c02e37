//! End-to-end scenarios driven entirely through in-memory fakes: a chain
//! advancing normally, then forking and being compensated mid-run.

use std::sync::Arc;

use alloy_primitives::{address, Address, Bytes, B256};
use chrono::Utc;

use chain_client::{BlockHeader, InMemoryChainClient, Log};
use checkpoint_store::InMemoryCheckpointStore;
use event_publisher::InMemoryEventPublisher;
use indexer_orchestrator::{ChainOrchestrator, ChainOrchestratorConfig, KnownCollections, OrchestratorLoop};
use raw_event_store::{InMemoryRawEventStore, RawEvent};
use reorg_handler::ReorgHandlerService;
use shared_types::ChainId;

fn block(number: u64, hash: u8, parent: u8) -> BlockHeader {
    BlockHeader {
        number,
        hash: B256::repeat_byte(hash),
        parent_hash: B256::repeat_byte(parent),
        timestamp: number,
    }
}

fn addr_topic(addr: Address) -> B256 {
    let mut buf = [0u8; 32];
    buf[12..].copy_from_slice(addr.as_slice());
    B256::from(buf)
}

fn mint_log(collection: Address, block_number: u64, block_hash: B256, recipient: Address) -> Log {
    Log {
        block_number,
        block_hash,
        tx_hash: B256::repeat_byte(block_number as u8 + 100),
        log_index: 0,
        address: collection,
        topics: vec![
            event_parser::SignatureTable::global()
                .signature_of(event_parser::ERC721_TRANSFER)
                .unwrap(),
            addr_topic(Address::ZERO),
            addr_topic(recipient),
            addr_topic(Address::ZERO),
        ],
        data: Bytes::new(),
    }
}

#[tokio::test]
async fn chain_advances_then_forks_and_resumes_from_common_ancestor() {
    let chain_id = ChainId::eip155(31_337);
    let factory = address!("00000000000000000000000000000000fac707");
    let collection = address!("0000000000000000000000000000000000c0de");
    let recipient = address!("00000000000000000000000000000000000b0b");

    let chain_client = Arc::new(InMemoryChainClient::new());
    let checkpoint_store = Arc::new(InMemoryCheckpointStore::new());
    let raw_event_store = Arc::new(InMemoryRawEventStore::new());
    let publisher = Arc::new(InMemoryEventPublisher::new());
    let reorg_handler = Arc::new(ReorgHandlerService::new(
        chain_client.clone(),
        checkpoint_store.clone(),
        raw_event_store.clone(),
    ));
    let known = Arc::new(KnownCollections::seed([collection]));

    let mut config = ChainOrchestratorConfig::new(chain_id.clone(), factory);
    config.required_confirmations = 1;
    config.max_block_batch = 1;

    let orchestrator = ChainOrchestrator::new(
        config,
        chain_client.clone(),
        checkpoint_store.clone(),
        raw_event_store.clone(),
        reorg_handler,
        publisher.clone(),
        known,
    );

    // Seed genesis so the reorg handler's ancestor search has a block 0 to
    // fall back on; a freshly booted node would have ingested this already.
    chain_client.push_block(block(0, 0, 0));
    raw_event_store
        .store(&RawEvent {
            chain_id: chain_id.clone(),
            tx_hash: "0xgenesis".to_string(),
            log_index: 0,
            block_number: 0,
            block_hash: B256::repeat_byte(0).to_string(),
            contract_address: collection.to_string(),
            event_name: None,
            signature: "0xgenesis".to_string(),
            topics: vec![],
            data: "0x".to_string(),
            confirmations: 1,
            observed_at: Utc::now(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    checkpoint_store
        .set_to_block(&chain_id, 0, Some(B256::repeat_byte(0).to_string()))
        .await
        .unwrap();

    for i in 1..=3u8 {
        chain_client.push_block(block(i as u64, i, i - 1));
        chain_client.push_log(mint_log(collection, i as u64, B256::repeat_byte(i), recipient));
    }
    orchestrator.tick().await.unwrap();

    let checkpoint = checkpoint_store.get(&chain_id).await.unwrap();
    assert_eq!(checkpoint.last_block, 3);
    assert_eq!(checkpoint.reorg_count, 0);
    assert_eq!(publisher.len(), 3);

    // Fork out blocks 2 and 3, replacing them with a heavier chain.
    chain_client.replace_block(block(2, 200, 1));
    chain_client.replace_block(block(3, 201, 200));
    chain_client.push_block(block(4, 202, 201));
    chain_client.push_log(mint_log(collection, 4, B256::repeat_byte(202), recipient));

    orchestrator.tick().await.unwrap();

    let checkpoint = checkpoint_store.get(&chain_id).await.unwrap();
    assert_eq!(checkpoint.reorg_count, 1);
    assert_eq!(checkpoint.last_block, 0);
    assert!(!raw_event_store
        .has_block(&chain_id, 2, &B256::repeat_byte(2).to_string())
        .await
        .unwrap());

    // Resume ingestion past the rolled-back cursor onto the new canonical chain.
    orchestrator.tick().await.unwrap();
    let checkpoint = checkpoint_store.get(&chain_id).await.unwrap();
    assert_eq!(checkpoint.last_block, 4);
}
