//! Builds every adapter and wires it to the port it serves, following
//! `node-runtime::container`'s shape: connect shared infrastructure once,
//! then hand out the concrete services each supervised task needs.

use std::sync::Arc;

use mongodb::Client as MongoClient;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use catalog_projector::{CatalogProjectorService, PostgresCatalogStore};
use chain_client::AlloyChainClient;
use checkpoint_store::PostgresCheckpointStore;
use event_publisher::LapinEventPublisher;
use indexer_orchestrator::{ChainOrchestrator, ChainOrchestratorConfig, KnownCollections};
use media_pipeline::{FilesystemObjectStore, HttpPinner, MediaPipelineService, MongoAssetStore};
use raw_event_store::MongoRawEventStore;
use reorg_handler::ReorgHandlerService;
use wallet_link::{PostgresWalletStore, WalletLinkService};

use crate::config::{ChainConfig, Config};
use crate::error::{NodeError, NodeResult};

/// One orchestrator per configured chain uses its own `AlloyChainClient` and
/// `ReorgHandlerService` (both are cheap and chain-specific) but shares the
/// Postgres checkpoint store, Mongo raw event store, and AMQP publisher.
pub type Orchestrator = ChainOrchestrator<
    AlloyChainClient,
    PostgresCheckpointStore,
    MongoRawEventStore,
    ReorgHandlerService<AlloyChainClient, PostgresCheckpointStore, MongoRawEventStore>,
    LapinEventPublisher,
>;

pub struct SharedInfra {
    pub postgres: PgPool,
    pub mongo: mongodb::Database,
    pub publisher: Arc<LapinEventPublisher>,
    pub checkpoint_store: Arc<PostgresCheckpointStore>,
    pub raw_event_store: Arc<MongoRawEventStore>,
}

impl SharedInfra {
    pub async fn connect(config: &Config) -> NodeResult<Self> {
        let postgres = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.postgres_dsn)
            .await
            .map_err(|e| NodeError::Bootstrap(format!("postgres: {e}")))?;

        let mongo_client = MongoClient::with_uri_str(&config.mongo_uri)
            .await
            .map_err(|e| NodeError::Bootstrap(format!("mongo: {e}")))?;
        let mongo = mongo_client.database(&config.mongo_database);

        let publisher = LapinEventPublisher::connect(&config.rabbitmq_url)
            .await
            .map_err(|e| NodeError::Bootstrap(format!("rabbitmq: {e}")))?;

        let checkpoint_store = Arc::new(PostgresCheckpointStore::new(postgres.clone()));
        let raw_event_store = Arc::new(MongoRawEventStore::new(&mongo));
        raw_event_store
            .ensure_indexes()
            .await
            .map_err(|e| NodeError::Bootstrap(format!("raw event store indexes: {e}")))?;

        Ok(Self {
            postgres,
            mongo,
            publisher: Arc::new(publisher),
            checkpoint_store,
            raw_event_store,
        })
    }

    pub fn build_orchestrator(&self, chain: &ChainConfig, polling_interval: std::time::Duration) -> NodeResult<Orchestrator> {
        let chain_client = Arc::new(
            AlloyChainClient::connect(&chain.rpc_url)
                .map_err(|e| NodeError::Bootstrap(format!("{}: {e}", chain.chain_id)))?,
        );

        let reorg_handler = Arc::new(ReorgHandlerService::new(
            chain_client.clone(),
            self.checkpoint_store.clone(),
            self.raw_event_store.clone(),
        ));

        let mut orchestrator_config = ChainOrchestratorConfig::new(chain.chain_id.clone(), chain.factory_address);
        if let Some(confirmations) = chain.confirmations_override {
            orchestrator_config.required_confirmations = confirmations;
        }
        orchestrator_config.polling_interval = polling_interval;

        Ok(ChainOrchestrator::new(
            orchestrator_config,
            chain_client,
            self.checkpoint_store.clone(),
            self.raw_event_store.clone(),
            reorg_handler,
            self.publisher.clone(),
            Arc::new(KnownCollections::new()),
        ))
    }

    pub async fn build_catalog_projector(&self) -> NodeResult<CatalogProjectorService<PostgresCatalogStore, LapinEventPublisher>> {
        let store = Arc::new(PostgresCatalogStore::new(self.postgres.clone()));
        Ok(CatalogProjectorService::new(store, self.publisher.clone()))
    }

    pub fn build_wallet_link(&self) -> WalletLinkService<PostgresWalletStore, LapinEventPublisher> {
        let store = Arc::new(PostgresWalletStore::new(self.postgres.clone()));
        WalletLinkService::new(store, self.publisher.clone())
    }

    pub async fn build_media_pipeline(
        &self,
        media_storage_root: &str,
        pinning_endpoint: &str,
    ) -> NodeResult<MediaPipelineService<MongoAssetStore, FilesystemObjectStore, HttpPinner>> {
        let asset_store = Arc::new(MongoAssetStore::new(&self.mongo));
        asset_store
            .ensure_indexes()
            .await
            .map_err(|e| NodeError::Bootstrap(format!("media asset indexes: {e}")))?;
        let object_store = Arc::new(FilesystemObjectStore::new(media_storage_root));
        let pinner = Arc::new(HttpPinner::new(pinning_endpoint));
        Ok(MediaPipelineService::new(asset_store, object_store, pinner))
    }
}
