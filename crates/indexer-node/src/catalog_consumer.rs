//! Binds and drains the catalog projector's queue. The publisher always
//! writes through the `collections.events` topic exchange regardless of
//! event family, so the queue here binds on the routing-key prefix
//! `CollectionCreated` actually publishes under rather than a separate
//! exchange per event family.

use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicNackOptions, ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties, ExchangeKind};
use serde::Deserialize;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use catalog_projector::CatalogProjector;
use event_publisher::EXCHANGE;
use shared_types::event::CollectionCreated;
use shared_types::DomainEvent;

use crate::error::{NodeError, NodeResult};

const QUEUE_NAME: &str = "catalog.collections.created";
const ROUTING_PATTERN: &str = "collections.events.created.*";

/// The subset of [`event_publisher::EventEnvelope`] this consumer needs.
/// `event_type` is a plain `String` here (the envelope's `&'static str`
/// isn't deserialisable from an owned payload), and unrecognised types are a
/// silent skip rather than an error — this queue only ever carries
/// `collection_created` today, but a future routing change should not crash
/// the consumer.
#[derive(Deserialize)]
struct WireEnvelope {
    event_type: String,
    data: serde_json::Value,
}

pub struct CatalogConsumer {
    channel: Channel,
}

impl CatalogConsumer {
    pub async fn connect(amqp_url: &str) -> NodeResult<Self> {
        let connection = Connection::connect(amqp_url, ConnectionProperties::default())
            .await
            .map_err(|e| NodeError::Bootstrap(format!("rabbitmq (catalog consumer): {e}")))?;
        let channel = connection
            .create_channel()
            .await
            .map_err(|e| NodeError::Bootstrap(format!("rabbitmq channel: {e}")))?;

        channel
            .exchange_declare(
                EXCHANGE,
                ExchangeKind::Topic,
                ExchangeDeclareOptions { durable: true, ..Default::default() },
                FieldTable::default(),
            )
            .await
            .map_err(|e| NodeError::Bootstrap(format!("exchange declare: {e}")))?;

        channel
            .queue_declare(QUEUE_NAME, QueueDeclareOptions { durable: true, ..Default::default() }, FieldTable::default())
            .await
            .map_err(|e| NodeError::Bootstrap(format!("queue declare: {e}")))?;

        channel
            .queue_bind(QUEUE_NAME, EXCHANGE, ROUTING_PATTERN, QueueBindOptions::default(), FieldTable::default())
            .await
            .map_err(|e| NodeError::Bootstrap(format!("queue bind: {e}")))?;

        Ok(Self { channel })
    }

    #[tracing::instrument(skip(self, projector, shutdown))]
    pub async fn run<P: CatalogProjector>(&self, projector: &P, mut shutdown: watch::Receiver<bool>) -> NodeResult<()> {
        let mut consumer = self
            .channel
            .basic_consume(QUEUE_NAME, "catalog-projector", BasicConsumeOptions::default(), FieldTable::default())
            .await
            .map_err(|e| NodeError::Bootstrap(format!("basic_consume: {e}")))?;

        info!("catalog consumer starting");
        loop {
            tokio::select! {
                delivery = consumer.next() => {
                    let Some(delivery) = delivery else {
                        warn!("catalog consumer channel closed");
                        return Ok(());
                    };
                    let delivery = match delivery {
                        Ok(d) => d,
                        Err(e) => {
                            error!(error = %e, "failed to receive delivery");
                            continue;
                        }
                    };

                    match Self::decode(&delivery.data) {
                        Some(event) => match projector.project(&event).await {
                            Ok(()) => {
                                let _ = delivery.ack(BasicAckOptions::default()).await;
                            }
                            Err(e) => {
                                error!(error = %e, "catalog projection failed, nacking for dead-letter");
                                let _ = delivery.nack(BasicNackOptions { requeue: false, ..Default::default() }).await;
                            }
                        },
                        None => {
                            debug!("skipping message this consumer doesn't recognise");
                            let _ = delivery.ack(BasicAckOptions::default()).await;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("catalog consumer stopping");
                        return Ok(());
                    }
                }
            }
        }
    }

    fn decode(payload: &[u8]) -> Option<DomainEvent> {
        let envelope: WireEnvelope = serde_json::from_slice(payload).ok()?;
        match envelope.event_type.as_str() {
            "collection_created" => {
                let created: CollectionCreated = serde_json::from_value(envelope.data).ok()?;
                Some(DomainEvent::CollectionCreated(created))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_ignores_event_types_this_queue_does_not_carry() {
        let payload = serde_json::json!({ "event_type": "wallet.linked", "data": {} });
        assert!(CatalogConsumer::decode(&serde_json::to_vec(&payload).unwrap()).is_none());
    }

    #[test]
    fn decode_rejects_malformed_payloads() {
        assert!(CatalogConsumer::decode(b"not json").is_none());
    }
}
