//! Drives the public `ReorgApi` surface the same way the orchestrator does:
//! the test keeps its own handles to the in-memory stores so it can assert
//! on state without reaching into the service's internals.

use std::sync::Arc;

use alloy_primitives::B256;
use chrono::Utc;

use chain_client::{BlockHeader, ChainClient, InMemoryChainClient};
use checkpoint_store::{CheckpointStore, InMemoryCheckpointStore};
use raw_event_store::{InMemoryRawEventStore, RawEvent, RawEventStore};
use reorg_handler::{ReorgApi, ReorgHandlerService, ReorgOutcome};
use shared_types::ChainId;

fn header(number: u64, hash: u8, parent: u8) -> BlockHeader {
    BlockHeader {
        number,
        hash: B256::repeat_byte(hash),
        parent_hash: B256::repeat_byte(parent),
        timestamp: number,
    }
}

fn observed_event(chain_id: ChainId, block_number: u64, block_hash: B256) -> RawEvent {
    RawEvent {
        chain_id,
        tx_hash: format!("0xtx{block_number}"),
        log_index: 0,
        block_number,
        block_hash: block_hash.to_string(),
        contract_address: "0xcontract".to_string(),
        event_name: Some("Transfer".to_string()),
        signature: "0xsig".to_string(),
        topics: vec![],
        data: "0x".to_string(),
        confirmations: 1,
        observed_at: Utc::now(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn straight_chain_never_triggers_a_reorg() {
    let chain_id = ChainId::eip155(1);
    let chain_client = Arc::new(InMemoryChainClient::new());
    let checkpoint_store = Arc::new(InMemoryCheckpointStore::new());
    let raw_event_store = Arc::new(InMemoryRawEventStore::new());
    let svc = ReorgHandlerService::new(chain_client.clone(), checkpoint_store.clone(), raw_event_store.clone());

    for i in 0..=10u8 {
        let head = header(i as u64, i, i.saturating_sub(1));
        chain_client.push_block(head);
        raw_event_store.store(&observed_event(chain_id.clone(), i as u64, head.hash)).await.unwrap();

        let outcome = svc.handle_new_head(&chain_id, &head).await.unwrap();
        let advance = match outcome {
            ReorgOutcome::Advanced(advance) => advance,
            ReorgOutcome::Reorged(_) => panic!("expected an advance"),
        };
        svc.commit_advance(&chain_id, &advance).await.unwrap();
    }

    let checkpoint = checkpoint_store.get(&chain_id).await.unwrap();
    assert_eq!(checkpoint.last_block, 10);
    assert_eq!(checkpoint.reorg_count, 0);
}

#[tokio::test]
async fn one_block_fork_rolls_back_to_the_shared_parent() {
    let chain_id = ChainId::eip155(1);
    let chain_client = Arc::new(InMemoryChainClient::new());
    let checkpoint_store = Arc::new(InMemoryCheckpointStore::new());
    let raw_event_store = Arc::new(InMemoryRawEventStore::new());
    let svc = ReorgHandlerService::new(chain_client.clone(), checkpoint_store.clone(), raw_event_store.clone());

    for i in 0..=4u8 {
        let head = header(i as u64, i, i.saturating_sub(1));
        chain_client.push_block(head);
        raw_event_store.store(&observed_event(chain_id.clone(), i as u64, head.hash)).await.unwrap();
        let outcome = svc.handle_new_head(&chain_id, &head).await.unwrap();
        let advance = match outcome {
            ReorgOutcome::Advanced(advance) => advance,
            ReorgOutcome::Reorged(_) => panic!("expected an advance"),
        };
        svc.commit_advance(&chain_id, &advance).await.unwrap();
    }

    // Block 4 gets replaced by a competing block at the same height.
    let competing = header(4, 99, 3);
    chain_client.replace_block(competing);

    let outcome = svc.handle_new_head(&chain_id, &competing).await.unwrap();
    let reorged = match outcome {
        ReorgOutcome::Reorged(r) => r,
        ReorgOutcome::Advanced(_) => panic!("expected a reorg"),
    };
    assert_eq!(reorged.history.old_head, 4);
    assert_eq!(reorged.history.affected_blocks, 2);

    let checkpoint = checkpoint_store.get(&chain_id).await.unwrap();
    assert_eq!(checkpoint.reorg_count, 1);
}
