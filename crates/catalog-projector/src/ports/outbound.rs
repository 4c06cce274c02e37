use async_trait::async_trait;

use crate::domain::{Collection, CollectionFields};
use crate::error::CatalogResult;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Inside one transaction: insert `(event_id, now())` into ProcessedEvent
    /// and, if that insert was the one that created the row, upsert the
    /// Collection keyed on `(chain_id, contract_address)`. `Ok(None)` means
    /// `event_id` had already been processed — commit-and-acknowledge with
    /// nothing further to publish.
    async fn upsert_collection(
        &self,
        event_id: &str,
        fields: &CollectionFields,
    ) -> CatalogResult<Option<(Collection, bool)>>;
}
