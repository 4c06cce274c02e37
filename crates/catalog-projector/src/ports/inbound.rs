use async_trait::async_trait;

use shared_types::DomainEvent;

use crate::error::CatalogResult;

/// Invoked once per message pulled off the bound queue. Events this
/// projector has no row for (mints, wallet links, reorg notices) are a
/// silent no-op rather than an error.
#[async_trait]
pub trait CatalogProjector: Send + Sync {
    async fn project(&self, event: &DomainEvent) -> CatalogResult<()>;
}
