//! Deduplicated raw blockchain event store.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::{InMemoryRawEventStore, MongoRawEventStore};
pub use domain::RawEvent;
pub use error::{RawEventStoreError, RawEventStoreResult};
pub use ports::RawEventStore;
