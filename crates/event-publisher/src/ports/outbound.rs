use async_trait::async_trait;

use shared_types::{ChainId, DomainEvent};

use crate::error::PublishResult;

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> PublishResult<()>;

    /// Sequential, first-error-aborts loop. No cross-message atomicity is
    /// claimed: a failure partway through leaves earlier messages published.
    async fn publish_batch(&self, events: &[DomainEvent]) -> PublishResult<()> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }

    /// Liveness ping on routing key `indexer.health.{chain_id}`, emitted by
    /// the orchestrator on a timer independent of the polling loop.
    async fn publish_heartbeat(&self, chain_id: &ChainId) -> PublishResult<()>;
}
