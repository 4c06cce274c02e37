use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use event_publisher::EventPublisher;
use shared_types::event::CollectionUpserted;
use shared_types::DomainEvent;

use crate::domain::CollectionFields;
use crate::error::{CatalogError, CatalogResult};
use crate::ports::inbound::CatalogProjector;
use crate::ports::outbound::CatalogStore;

pub struct CatalogProjectorService<S, P>
where
    S: CatalogStore,
    P: EventPublisher,
{
    store: Arc<S>,
    publisher: Arc<P>,
}

impl<S, P> CatalogProjectorService<S, P>
where
    S: CatalogStore,
    P: EventPublisher,
{
    pub fn new(store: Arc<S>, publisher: Arc<P>) -> Self {
        Self { store, publisher }
    }

    async fn project_collection_created(
        &self,
        event_id: &str,
        fields: CollectionFields,
    ) -> CatalogResult<()> {
        let Some((collection, is_new)) = self.store.upsert_collection(event_id, &fields).await?
        else {
            return Ok(());
        };

        let derived = DomainEvent::CollectionUpserted(CollectionUpserted {
            chain_id: collection.chain_id.clone(),
            contract_address: collection.contract_address,
            collection_id: collection.id.to_string(),
            slug: collection.slug.clone(),
            is_new,
        });

        if let Err(e) = self.publisher.publish(&derived).await {
            warn!(
                chain_id = %collection.chain_id,
                collection_id = %collection.id,
                error = %e,
                "failed to publish derived collection_upserted event"
            );
        }

        Ok(())
    }
}

#[async_trait]
impl<S, P> CatalogProjector for CatalogProjectorService<S, P>
where
    S: CatalogStore + 'static,
    P: EventPublisher + 'static,
{
    async fn project(&self, event: &DomainEvent) -> CatalogResult<()> {
        let DomainEvent::CollectionCreated(created) = event else {
            return Ok(());
        };

        let event_id = event
            .source_event_id()
            .ok_or_else(|| CatalogError::Corrupted("CollectionCreated without a source event id".to_string()))?;

        let fields = CollectionFields {
            chain_id: created.chain_id.clone(),
            contract_address: created.collection,
            creator: created.creator,
            name: created.name.clone(),
            symbol: created.symbol.clone(),
            max_supply: created.max_supply,
        };

        self.project_collection_created(&event_id, fields).await
    }
}
