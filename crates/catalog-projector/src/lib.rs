//! Projects `CollectionCreated` domain events onto the Collection catalog
//! read model, guarded by a `ProcessedEvent` idempotency table.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryCatalogStore, PostgresCatalogStore};
pub use domain::{Collection, CollectionFields};
pub use error::{CatalogError, CatalogResult};
pub use ports::{CatalogProjector, CatalogStore};
pub use service::CatalogProjectorService;
