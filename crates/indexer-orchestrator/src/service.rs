use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, warn};

use chain_client::{ChainClient, LogFilter};
use checkpoint_store::CheckpointStore;
use event_parser::{parse_log, RawLog, COLLECTION_CREATED, ERC1155_TRANSFER_BATCH, ERC1155_TRANSFER_SINGLE, ERC721_TRANSFER, SignatureTable};
use event_publisher::EventPublisher;
use raw_event_store::RawEventStore;
use reorg_handler::{ReorgApi, ReorgOutcome};
use shared_types::{Classified, DomainEvent};

use crate::domain::{build_raw_event, sort_logs, with_retry, ChainOrchestratorConfig, KnownCollections, INTER_BATCH_PAUSE};
use crate::error::OrchestratorResult;
use crate::ports::inbound::OrchestratorLoop;

/// Drives log ingestion for one configured chain: reorg check, bounded batch
/// fetch, idempotent raw-event persistence, confirmation-gated publish.
pub struct ChainOrchestrator<C, K, R, G, P>
where
    C: ChainClient,
    K: CheckpointStore,
    R: RawEventStore,
    G: ReorgApi,
    P: EventPublisher,
{
    config: ChainOrchestratorConfig,
    chain_client: Arc<C>,
    checkpoint_store: Arc<K>,
    raw_event_store: Arc<R>,
    reorg_handler: Arc<G>,
    publisher: Arc<P>,
    known_collections: Arc<KnownCollections>,
}

impl<C, K, R, G, P> ChainOrchestrator<C, K, R, G, P>
where
    C: ChainClient,
    K: CheckpointStore,
    R: RawEventStore,
    G: ReorgApi,
    P: EventPublisher,
{
    pub fn new(
        config: ChainOrchestratorConfig,
        chain_client: Arc<C>,
        checkpoint_store: Arc<K>,
        raw_event_store: Arc<R>,
        reorg_handler: Arc<G>,
        publisher: Arc<P>,
        known_collections: Arc<KnownCollections>,
    ) -> Self {
        Self {
            config,
            chain_client,
            checkpoint_store,
            raw_event_store,
            reorg_handler,
            publisher,
            known_collections,
        }
    }

    fn mint_topics() -> Vec<alloy_primitives::B256> {
        let table = SignatureTable::global();
        [ERC721_TRANSFER, ERC1155_TRANSFER_SINGLE, ERC1155_TRANSFER_BATCH]
            .into_iter()
            .filter_map(|name| table.signature_of(name))
            .collect()
    }

    fn collection_created_topic() -> Option<alloy_primitives::B256> {
        SignatureTable::global().signature_of(COLLECTION_CREATED)
    }

    async fn fetch_batch_logs(&self, from: u64, to: u64) -> OrchestratorResult<Vec<chain_client::Log>> {
        let mut logs = Vec::new();

        let factory_filter = LogFilter {
            from_block: from,
            to_block: to,
            addresses: vec![self.config.factory_address],
            topics: Self::collection_created_topic().into_iter().collect(),
        };
        logs.extend(with_retry("get_logs:factory", || self.chain_client.get_logs(&factory_filter)).await?);

        let known = self.known_collections.all();
        if !known.is_empty() {
            let mint_filter = LogFilter {
                from_block: from,
                to_block: to,
                addresses: known,
                topics: Self::mint_topics(),
            };
            logs.extend(with_retry("get_logs:mint", || self.chain_client.get_logs(&mint_filter)).await?);
        }

        sort_logs(&mut logs);
        Ok(logs)
    }

    async fn process_log(&self, log: &chain_client::Log) -> OrchestratorResult<()> {
        let confirmations = with_retry("confirmations", || self.chain_client.confirmations(log.block_number)).await?;
        let raw_event = build_raw_event(&self.config.chain_id, log, confirmations);

        let is_fresh = self.raw_event_store.store(&raw_event).await?;

        let raw_log = RawLog {
            chain_id: self.config.chain_id.clone(),
            contract_address: log.address,
            tx_hash: log.tx_hash,
            log_index: log.log_index,
            topics: &log.topics,
            data: log.data.as_ref(),
        };

        let parsed = match parse_log(&raw_log) {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    chain_id = %self.config.chain_id,
                    tx_hash = %log.tx_hash,
                    log_index = log.log_index,
                    error = %e,
                    "skipping log that failed to decode"
                );
                return Ok(());
            }
        };

        if let DomainEvent::CollectionCreated(ref created) = parsed {
            self.known_collections.observe(created.collection);
        }

        if is_fresh && confirmations >= self.config.required_confirmations {
            self.publisher.publish(&parsed).await?;
        }

        Ok(())
    }

    async fn run_batch(&self, from: u64, to: u64) -> OrchestratorResult<ReorgOutcome> {
        let head_header = with_retry("block_by_number", || self.chain_client.block_by_number(to)).await?;
        let outcome = self
            .reorg_handler
            .handle_new_head(&self.config.chain_id, &head_header)
            .await?;

        let advance = match outcome {
            ReorgOutcome::Reorged(ref reorged) => {
                warn!(
                    chain_id = %self.config.chain_id,
                    fork_block = reorged.history.fork_block,
                    affected_blocks = reorged.history.affected_blocks,
                    "reorg compensated, publishing notification"
                );
                let notification = DomainEvent::ReorgDetected(reorged.notification.clone());
                self.publisher.publish(&notification).await?;
                return Ok(outcome);
            }
            ReorgOutcome::Advanced(ref advance) => advance.clone(),
        };

        let logs = self.fetch_batch_logs(from, to).await?;
        for log in &logs {
            self.process_log(log).await?;
        }

        // Only now that every log in the batch has been stored and publish
        // attempted is it safe to move the checkpoint past `to`.
        self.reorg_handler
            .commit_advance(&self.config.chain_id, &advance)
            .await?;

        Ok(outcome)
    }
}

#[async_trait]
impl<C, K, R, G, P> OrchestratorLoop for ChainOrchestrator<C, K, R, G, P>
where
    C: ChainClient + 'static,
    K: CheckpointStore + 'static,
    R: RawEventStore + 'static,
    G: ReorgApi + 'static,
    P: EventPublisher + 'static,
{
    async fn tick(&self) -> OrchestratorResult<()> {
        let checkpoint = self.checkpoint_store.get(&self.config.chain_id).await?;
        let mut from = checkpoint.last_block + 1;
        let head = self.chain_client.latest_block().await?;

        if from > head {
            return Ok(());
        }

        while from <= head {
            let to = (from + self.config.max_block_batch - 1).min(head);
            let outcome = self.run_batch(from, to).await?;

            if matches!(outcome, ReorgOutcome::Reorged(_)) {
                break;
            }

            from = to + 1;
            if from <= head {
                sleep(INTER_BATCH_PAUSE).await;
            }
        }

        Ok(())
    }

    async fn run(&self, mut shutdown: watch::Receiver<bool>) -> OrchestratorResult<()> {
        let mut ticker = tokio::time::interval(self.config.polling_interval);
        info!(chain_id = %self.config.chain_id, "orchestrator loop starting");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        error!(chain_id = %self.config.chain_id, error = %e, "orchestrator tick failed");
                        if e.is_fatal() {
                            return Err(e);
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!(chain_id = %self.config.chain_id, "orchestrator loop stopping");
                        return Ok(());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Address, Bytes, U256};

    use chain_client::{BlockHeader, InMemoryChainClient, Log};
    use checkpoint_store::InMemoryCheckpointStore;
    use event_publisher::InMemoryEventPublisher;
    use raw_event_store::InMemoryRawEventStore;
    use reorg_handler::ReorgHandlerService;

    fn addr_topic(addr: Address) -> alloy_primitives::B256 {
        let mut buf = [0u8; 32];
        buf[12..].copy_from_slice(addr.as_slice());
        alloy_primitives::B256::from(buf)
    }

    fn u256_topic(value: u64) -> alloy_primitives::B256 {
        alloy_primitives::B256::from(U256::from(value).to_be_bytes::<32>())
    }

    type TestOrchestrator = ChainOrchestrator<
        InMemoryChainClient,
        InMemoryCheckpointStore,
        InMemoryRawEventStore,
        ReorgHandlerService<InMemoryChainClient, InMemoryCheckpointStore, InMemoryRawEventStore>,
        InMemoryEventPublisher,
    >;

    fn build() -> (TestOrchestrator, Arc<InMemoryChainClient>, Arc<InMemoryRawEventStore>, Arc<InMemoryEventPublisher>, Arc<InMemoryCheckpointStore>) {
        let chain_id = shared_types::ChainId::eip155(31_337);
        let factory = address!("00000000000000000000000000000000fac707");
        let collection = address!("0000000000000000000000000000000000c0de");

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

        let mut config = ChainOrchestratorConfig::new(chain_id, factory);
        config.required_confirmations = 1;

        let orchestrator = ChainOrchestrator::new(
            config,
            chain_client.clone(),
            checkpoint_store.clone(),
            raw_event_store.clone(),
            reorg_handler,
            publisher.clone(),
            known,
        );

        (orchestrator, chain_client, raw_event_store, publisher, checkpoint_store)
    }

    #[tokio::test]
    async fn tick_ingests_known_collection_mint_and_advances_checkpoint() {
        let (orchestrator, chain_client, raw_event_store, publisher, checkpoint_store) = build();
        let collection = address!("0000000000000000000000000000000000c0de");
        let recipient = address!("00000000000000000000000000000000000b0b");

        chain_client.push_block(BlockHeader {
            number: 1,
            hash: alloy_primitives::B256::repeat_byte(1),
            parent_hash: alloy_primitives::B256::ZERO,
            timestamp: 1,
        });
        chain_client.push_block(BlockHeader {
            number: 2,
            hash: alloy_primitives::B256::repeat_byte(2),
            parent_hash: alloy_primitives::B256::repeat_byte(1),
            timestamp: 2,
        });

        chain_client.push_log(Log {
            block_number: 1,
            block_hash: alloy_primitives::B256::repeat_byte(1),
            tx_hash: alloy_primitives::B256::repeat_byte(9),
            log_index: 0,
            address: collection,
            topics: vec![
                event_parser::SignatureTable::global()
                    .signature_of(event_parser::ERC721_TRANSFER)
                    .unwrap(),
                addr_topic(Address::ZERO),
                addr_topic(recipient),
                u256_topic(1),
            ],
            data: Bytes::new(),
        });

        orchestrator.tick().await.unwrap();

        assert_eq!(raw_event_store.len(), 1);
        assert_eq!(publisher.len(), 1);
        assert_eq!(publisher.published()[0].1.event_type, "mint.indexed");

        let checkpoint = checkpoint_store.get(&shared_types::ChainId::eip155(31_337)).await.unwrap();
        assert_eq!(checkpoint.last_block, 2);
    }

    #[tokio::test]
    async fn tick_with_no_new_blocks_is_a_no_op() {
        let (orchestrator, chain_client, raw_event_store, publisher, _) = build();
        chain_client.push_block(BlockHeader {
            number: 0,
            hash: alloy_primitives::B256::ZERO,
            parent_hash: alloy_primitives::B256::ZERO,
            timestamp: 0,
        });

        orchestrator.tick().await.unwrap();

        assert!(raw_event_store.is_empty());
        assert!(publisher.is_empty());
    }
}
