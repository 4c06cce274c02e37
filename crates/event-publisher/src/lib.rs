//! Publishes domain events onto the topic-routed `collections.events`
//! exchange.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::{InMemoryEventPublisher, LapinEventPublisher};
pub use domain::{EventEnvelope, EXCHANGE};
pub use error::{PublishError, PublishResult};
pub use ports::EventPublisher;
