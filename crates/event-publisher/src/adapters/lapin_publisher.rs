use async_trait::async_trait;
use lapin::options::{BasicPublishOptions, ExchangeDeclareOptions};
use lapin::types::{AMQPValue, FieldTable, LongString};
use lapin::publisher_confirm::Confirmation;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, ExchangeKind};

use shared_types::{ChainId, DomainEvent};

use crate::domain::envelope::{EventEnvelope, CONTENT_TYPE, EXCHANGE};
use crate::error::{PublishError, PublishResult};
use crate::ports::outbound::EventPublisher;

/// Publishes onto the topic-routed `collections.events` exchange. One
/// channel is held open for the lifetime of the adapter; callers share it
/// behind an `Arc`.
pub struct LapinEventPublisher {
    channel: Channel,
}

impl LapinEventPublisher {
    pub async fn connect(amqp_url: &str) -> PublishResult<Self> {
        let connection = Connection::connect(amqp_url, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        channel
            .exchange_declare(
                EXCHANGE,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;
        Ok(Self { channel })
    }

    fn headers(envelope: &EventEnvelope) -> FieldTable {
        let mut headers = FieldTable::default();
        headers.insert(
            "event_type".into(),
            AMQPValue::LongString(LongString::from(envelope.event_type)),
        );
        headers.insert(
            "chain_id".into(),
            AMQPValue::LongString(LongString::from(envelope.chain_id.as_str())),
        );
        headers.insert(
            "schema".into(),
            AMQPValue::LongString(LongString::from(envelope.schema)),
        );
        headers.insert(
            "version".into(),
            AMQPValue::LongString(LongString::from(envelope.version)),
        );
        headers.insert(
            "published_at".into(),
            AMQPValue::LongLongInt(envelope.timestamp),
        );
        headers.insert(
            "content_type".into(),
            AMQPValue::LongString(LongString::from(CONTENT_TYPE)),
        );
        headers
    }
}

#[async_trait]
impl EventPublisher for LapinEventPublisher {
    async fn publish(&self, event: &DomainEvent) -> PublishResult<()> {
        let envelope = EventEnvelope::from_event(event);
        let routing_key = EventEnvelope::routing_key(event);
        let payload = serde_json::to_vec(&envelope)
            .map_err(|e| PublishError::Serialize(e.to_string()))?;

        let properties = BasicProperties::default()
            .with_content_type(CONTENT_TYPE.into())
            .with_delivery_mode(2)
            .with_headers(Self::headers(&envelope));

        let confirm = self
            .channel
            .basic_publish(
                EXCHANGE,
                &routing_key,
                BasicPublishOptions::default(),
                &payload,
                properties,
            )
            .await?
            .await?;

        if matches!(confirm, Confirmation::Nack(_)) {
            return Err(PublishError::Unconfirmed(routing_key));
        }
        Ok(())
    }

    async fn publish_heartbeat(&self, chain_id: &ChainId) -> PublishResult<()> {
        let envelope = EventEnvelope::heartbeat(chain_id);
        let routing_key = EventEnvelope::heartbeat_routing_key(chain_id);
        let payload = serde_json::to_vec(&envelope).map_err(|e| PublishError::Serialize(e.to_string()))?;

        let properties = BasicProperties::default()
            .with_content_type(CONTENT_TYPE.into())
            .with_delivery_mode(2)
            .with_headers(Self::headers(&envelope));

        let confirm = self
            .channel
            .basic_publish(EXCHANGE, &routing_key, BasicPublishOptions::default(), &payload, properties)
            .await?
            .await?;

        if matches!(confirm, Confirmation::Nack(_)) {
            return Err(PublishError::Unconfirmed(routing_key));
        }
        Ok(())
    }
}
