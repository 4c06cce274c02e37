use async_trait::async_trait;
use parking_lot::Mutex;

use shared_types::{ChainId, DomainEvent};

use crate::domain::envelope::EventEnvelope;
use crate::error::PublishResult;
use crate::ports::outbound::EventPublisher;

/// Records every published envelope instead of talking to a broker, for
/// orchestrator/catalog-projector/wallet-link tests.
#[derive(Default)]
pub struct InMemoryEventPublisher {
    published: Mutex<Vec<(String, EventEnvelope)>>,
}

impl InMemoryEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<(String, EventEnvelope)> {
        self.published.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.published.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, event: &DomainEvent) -> PublishResult<()> {
        let routing_key = EventEnvelope::routing_key(event);
        let envelope = EventEnvelope::from_event(event);
        self.published.lock().push((routing_key, envelope));
        Ok(())
    }

    async fn publish_heartbeat(&self, chain_id: &ChainId) -> PublishResult<()> {
        let routing_key = EventEnvelope::heartbeat_routing_key(chain_id);
        let envelope = EventEnvelope::heartbeat(chain_id);
        self.published.lock().push((routing_key, envelope));
        Ok(())
    }
}
